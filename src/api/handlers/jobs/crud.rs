//! Job create, read, update and delete endpoints.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{ownership::ensure_can_mutate, types::JobRequest, SharedJobStore};
use crate::api::{
    error::ApiError,
    handlers::auth::CurrentUser,
    response::{respond, respond_empty, Envelope, ErrorResponse, JobData, JobsData, NoData},
};
use crate::models::Job;

/// Ids that do not parse cannot exist.
fn parse_job_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound("Job"))
}

/// Fetch by id alone so "missing" and "not yours" stay distinguishable.
async fn load_for_mutation(
    store: &SharedJobStore,
    id: Uuid,
    caller: Uuid,
) -> Result<Job, ApiError> {
    let job = store.find_job(id).await?.ok_or(ApiError::NotFound("Job"))?;
    ensure_can_mutate(&job, caller)?;
    Ok(job)
}

#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = JobRequest,
    responses(
        (status = 201, description = "Job created", body = Envelope<JobData>),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
#[instrument(skip(store, caller, payload), fields(user_id = %caller.id))]
pub async fn create_job(
    store: Extension<SharedJobStore>,
    caller: Extension<CurrentUser>,
    payload: Option<Json<JobRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::MalformedBody);
    };
    let draft = request.validate()?;
    let job = store.insert_job(caller.id, &draft).await?;
    info!(job_id = %job.id, "job created");
    Ok(respond(
        StatusCode::CREATED,
        "Job created successfully",
        JobData { job },
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    responses(
        (status = 200, description = "Caller's jobs, oldest first", body = Envelope<JobsData>),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
#[instrument(skip(store, caller), fields(user_id = %caller.id))]
pub async fn list_jobs(
    store: Extension<SharedJobStore>,
    caller: Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let jobs = store.list_jobs(caller.id).await?;
    Ok(respond(
        StatusCode::OK,
        "Data retrieved successfully",
        JobsData { jobs },
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "The job", body = Envelope<JobData>),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
        (status = 404, description = "No such job for this caller", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
#[instrument(skip(store, caller), fields(user_id = %caller.id))]
pub async fn get_job(
    store: Extension<SharedJobStore>,
    caller: Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_job_id(&id)?;
    let job = store
        .find_job_for_owner(id, caller.id)
        .await?
        .ok_or(ApiError::NotFound("Job"))?;
    Ok(respond(
        StatusCode::OK,
        "Data retrieved successfully",
        JobData { job },
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    request_body = JobRequest,
    responses(
        (status = 200, description = "Job updated", body = Envelope<JobData>),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
        (status = 403, description = "Job belongs to someone else", body = ErrorResponse),
        (status = 404, description = "No such job", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
#[instrument(skip(store, caller, payload), fields(user_id = %caller.id))]
pub async fn update_job(
    store: Extension<SharedJobStore>,
    caller: Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Option<Json<JobRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::MalformedBody);
    };
    let draft = request.validate()?;
    let id = parse_job_id(&id)?;
    let job = load_for_mutation(&store, id, caller.id).await?;

    if !store.update_job(job.id, &draft).await? {
        return Err(ApiError::NotFound("Job"));
    }

    info!(job_id = %job.id, "job updated");
    let job = Job {
        company: draft.company,
        position: draft.position,
        job_location: draft.job_location,
        status: draft.status,
        job_type: draft.job_type,
        ..job
    };
    Ok(respond(
        StatusCode::OK,
        "Job updated successfully",
        JobData { job },
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job deleted", body = Envelope<NoData>),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
        (status = 403, description = "Job belongs to someone else", body = ErrorResponse),
        (status = 404, description = "No such job", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
#[instrument(skip(store, caller), fields(user_id = %caller.id))]
pub async fn delete_job(
    store: Extension<SharedJobStore>,
    caller: Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_job_id(&id)?;
    let job = load_for_mutation(&store, id, caller.id).await?;

    if !store.delete_job(job.id).await? {
        return Err(ApiError::NotFound("Job"));
    }

    info!(job_id = %job.id, "job deleted");
    Ok(respond_empty(StatusCode::OK, "Job deleted successfully"))
}
