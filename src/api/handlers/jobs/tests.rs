//! Router-level job tests: the real gate, handlers and envelope over the
//! in-memory store.

use crate::api::{
    app,
    email::LogEmailSender,
    handlers::auth::{token::SESSION_TTL_SECONDS, AuthConfig, AuthState, SessionCodec},
};
use crate::models::{Job, JobStatus, JobType};
use crate::store::MemoryStore;
use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "jobs-secret-jobs-secret-jobs-secret";

struct Fixture {
    router: Router,
    store: Arc<MemoryStore>,
    codec: Arc<SessionCodec>,
}

impl Fixture {
    fn new() -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let secret = SecretString::from(SECRET.to_string());
        let state = Arc::new(AuthState::new(
            AuthConfig::default(),
            SessionCodec::new(&secret)?,
            store.clone(),
            Arc::new(LogEmailSender),
        ));
        Ok(Self {
            router: app(state, store.clone()),
            store,
            codec: Arc::new(SessionCodec::new(&secret)?),
        })
    }

    fn token_for(&self, user: Uuid) -> Result<String> {
        Ok(self.codec.issue(user, "someone@x.com")?)
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    async fn create(&self, token: &str, company: &str) -> Result<String> {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/jobs",
                Some(token),
                Some(job_body(company)),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        Ok(body["data"]["job"]["id"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}

fn job_body(company: &str) -> Value {
    json!({
        "company": company,
        "position": "Engineer",
        "jobLocation": "Remote",
        "jobType": "Full-Time"
    })
}

fn seeded(owner: Uuid, status: JobStatus, year: i32, month: u32, day: u32) -> Job {
    Job {
        id: Uuid::new_v4(),
        company: "Seeded".to_string(),
        position: "Engineer".to_string(),
        job_location: "Remote".to_string(),
        status,
        job_type: JobType::Contract,
        created_by: owner,
        created_at: Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
    }
}

#[tokio::test]
async fn routes_require_a_session_token() -> Result<()> {
    let fixture = Fixture::new()?;

    let (status, body) = fixture
        .call(Method::GET, "/api/v1/jobs", None, None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not Authorized");
    assert_eq!(body["response_code"], 401);

    let (status, _) = fixture
        .call(Method::GET, "/api/v1/jobs", Some("not-a-jwt"), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let other = SessionCodec::new(&SecretString::from(
        "a-completely-different-signing-secret".to_string(),
    ))?;
    let forged = other.issue(Uuid::new_v4(), "x@x.com")?;
    let (status, _) = fixture
        .call(Method::GET, "/api/v1/jobs/stats", Some(&forged), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = fixture.codec.issue_at(
        Uuid::new_v4(),
        "x@x.com",
        Utc::now().timestamp() - SESSION_TTL_SECONDS,
    )?;
    let (status, body) = fixture
        .call(Method::GET, "/api/v1/jobs", Some(&expired), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not Authorized");
    Ok(())
}

#[tokio::test]
async fn create_stamps_the_caller_and_defaults_status() -> Result<()> {
    let fixture = Fixture::new()?;
    let caller = Uuid::new_v4();
    let token = fixture.token_for(caller)?;

    let (status, body) = fixture
        .call(
            Method::POST,
            "/api/v1/jobs",
            Some(&token),
            Some(json!({
                "company": "Acme",
                "position": "Engineer",
                "jobLocation": "Berlin",
                "jobType": "Remote",
                "createdBy": Uuid::new_v4()
            })),
        )
        .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Job created successfully");
    let job = &body["data"]["job"];
    assert_eq!(job["createdBy"], caller.to_string());
    assert_eq!(job["status"], "pending");
    assert_eq!(job["jobType"], "Remote");
    Ok(())
}

#[tokio::test]
async fn create_reports_the_first_missing_field() -> Result<()> {
    let fixture = Fixture::new()?;
    let token = fixture.token_for(Uuid::new_v4())?;

    let (status, body) = fixture
        .call(
            Method::POST,
            "/api/v1/jobs",
            Some(&token),
            Some(json!({ "position": "Engineer" })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide company");

    let (status, body) = fixture
        .call(
            Method::POST,
            "/api/v1/jobs",
            Some(&token),
            Some(json!({
                "company": "Acme",
                "position": "Engineer",
                "jobLocation": "Berlin",
                "jobType": "Gig"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid jobType");

    let (status, _) = fixture.call(Method::GET, "/api/v1/jobs", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn list_and_get_are_scoped_to_the_caller() -> Result<()> {
    let fixture = Fixture::new()?;
    let alice = fixture.token_for(Uuid::new_v4())?;
    let bob = fixture.token_for(Uuid::new_v4())?;

    let first = fixture.create(&alice, "Acme").await?;
    fixture.create(&alice, "Globex").await?;
    let bobs = fixture.create(&bob, "Initech").await?;

    let (status, body) = fixture.call(Method::GET, "/api/v1/jobs", Some(&alice), None).await?;
    assert_eq!(status, StatusCode::OK);
    let jobs = body["data"]["jobs"].as_array().cloned().unwrap_or_default();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["company"], "Acme");
    assert_eq!(jobs[1]["company"], "Globex");

    let (status, body) = fixture
        .call(Method::GET, &format!("/api/v1/jobs/{first}"), Some(&alice), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["job"]["id"], first);

    let (status, _) = fixture
        .call(Method::GET, &format!("/api/v1/jobs/{bobs}"), Some(&alice), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn mutations_distinguish_missing_from_foreign() -> Result<()> {
    let fixture = Fixture::new()?;
    let owner = fixture.token_for(Uuid::new_v4())?;
    let intruder = fixture.token_for(Uuid::new_v4())?;
    let id = fixture.create(&owner, "Acme").await?;

    let (status, body) = fixture
        .call(
            Method::PATCH,
            &format!("/api/v1/jobs/{id}"),
            Some(&intruder),
            Some(job_body("Hijacked")),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not allowed to modify this job");

    let (status, _) = fixture
        .call(Method::DELETE, &format!("/api/v1/jobs/{id}"), Some(&intruder), None)
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let missing = Uuid::new_v4();
    let (status, _) = fixture
        .call(
            Method::PATCH,
            &format!("/api/v1/jobs/{missing}"),
            Some(&owner),
            Some(job_body("Acme")),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = fixture
        .call(Method::DELETE, "/api/v1/jobs/not-a-uuid", Some(&owner), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Job not found");

    // The owner's job is untouched by the rejected attempts.
    let (_, body) = fixture
        .call(Method::GET, &format!("/api/v1/jobs/{id}"), Some(&owner), None)
        .await?;
    assert_eq!(body["data"]["job"]["company"], "Acme");
    Ok(())
}

#[tokio::test]
async fn owner_can_update_and_delete() -> Result<()> {
    let fixture = Fixture::new()?;
    let caller = Uuid::new_v4();
    let token = fixture.token_for(caller)?;
    let id = fixture.create(&token, "Acme").await?;

    let mut update = job_body("Acme Corp");
    update["status"] = json!("interview");
    let (status, body) = fixture
        .call(
            Method::PATCH,
            &format!("/api/v1/jobs/{id}"),
            Some(&token),
            Some(update),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job updated successfully");
    assert_eq!(body["data"]["job"]["company"], "Acme Corp");
    assert_eq!(body["data"]["job"]["status"], "interview");
    assert_eq!(body["data"]["job"]["createdBy"], caller.to_string());

    let (status, body) = fixture
        .call(Method::DELETE, &format!("/api/v1/jobs/{id}"), Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job deleted successfully");

    let (status, _) = fixture
        .call(Method::GET, &format!("/api/v1/jobs/{id}"), Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn stats_count_statuses_and_months_oldest_first() -> Result<()> {
    let fixture = Fixture::new()?;
    let caller = Uuid::new_v4();
    let token = fixture.token_for(caller)?;

    fixture
        .store
        .seed_job(seeded(caller, JobStatus::Pending, 2024, 1, 3))
        .await;
    fixture
        .store
        .seed_job(seeded(caller, JobStatus::Interview, 2024, 1, 20))
        .await;
    fixture
        .store
        .seed_job(seeded(caller, JobStatus::Declined, 2024, 3, 9))
        .await;
    fixture
        .store
        .seed_job(seeded(Uuid::new_v4(), JobStatus::Accepted, 2024, 3, 9))
        .await;

    let (status, body) = fixture
        .call(Method::GET, "/api/v1/jobs/stats", Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["defaultStats"],
        json!({ "pending": 1, "interview": 1, "accepted": 0, "declined": 1 })
    );
    assert_eq!(
        body["data"]["monthlyApplications"],
        json!([
            { "date": "Jan 2024", "count": 2 },
            { "date": "Mar 2024", "count": 1 }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn stats_for_a_new_user_are_all_zero() -> Result<()> {
    let fixture = Fixture::new()?;
    let token = fixture.token_for(Uuid::new_v4())?;

    let (status, body) = fixture
        .call(Method::GET, "/api/v1/jobs/stats", Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["defaultStats"],
        json!({ "pending": 0, "interview": 0, "accepted": 0, "declined": 0 })
    );
    assert_eq!(body["data"]["monthlyApplications"], json!([]));
    Ok(())
}
