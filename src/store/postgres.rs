//! `PostgreSQL` store built on a shared `sqlx` pool.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::{CredentialStore, JobStore, StoreError, StoreResult};
use crate::models::{
    Job, JobDraft, JobStatus, JobType, MonthlyCount, NewUser, ProfileUpdate, StatusCounts,
    UserRecord,
};

/// Schema applied at startup; every statement is idempotent.
pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database described by `dsn`.
    ///
    /// # Errors
    /// Returns an error if the pool cannot establish its first connection.
    pub async fn connect(dsn: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the tables and indexes if they are missing.
    ///
    /// # Errors
    /// Returns an error naming the first statement that failed.
    pub async fn apply_schema(&self) -> Result<()> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            let span = tracing::info_span!(
                "db.query",
                db.system = "postgresql",
                db.operation = "DDL",
                db.statement = statement.as_str()
            );
            sqlx::query(statement)
                .execute(&self.pool)
                .instrument(span)
                .await
                .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
        }
        Ok(())
    }
}

/// Split a schema file into statements terminated by `;` at end of line.
pub(crate) fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") && current.trim().is_empty() {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn user_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        location: row.get("location"),
        password_hash: row.get("password_hash"),
        is_verified: row.get("is_verified"),
        verification_token: row.get("verification_token"),
    }
}

fn job_from_row(row: &PgRow) -> StoreResult<Job> {
    let status: String = row.get("status");
    let job_type: String = row.get("job_type");
    Ok(Job {
        id: row.get("id"),
        company: row.get("company"),
        position: row.get("position"),
        job_location: row.get("job_location"),
        status: status.parse::<JobStatus>()?,
        job_type: job_type.parse::<JobType>()?,
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
    })
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, location, password_hash, \
     is_verified, verification_token";

const JOB_COLUMNS: &str =
    "id, company, position, job_location, status, job_type, created_by, created_at";

#[async_trait]
impl CredentialStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        let query = "SELECT 1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        sqlx::query(query)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 LIMIT 1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<Uuid> {
        let query = r"
            INSERT INTO users
                (first_name, last_name, email, location, password_hash, verification_token)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.location)
            .bind(&user.password_hash)
            .bind(&user.verification_token)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(row.get("id")),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_profile(&self, id: Uuid, profile: &ProfileUpdate) -> StoreResult<bool> {
        let query = r"
            UPDATE users
            SET first_name = $2,
                last_name = $3,
                location = $4
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(id)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.location)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_verified(&self, id: Uuid, token: &str) -> StoreResult<bool> {
        // Conditional on the token so a replayed link cannot flip state twice.
        let query = r"
            UPDATE users
            SET is_verified = TRUE,
                verification_token = NULL
            WHERE id = $1
              AND verification_token = $2
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn insert_job(&self, owner: Uuid, draft: &JobDraft) -> StoreResult<Job> {
        let query = format!(
            "INSERT INTO jobs (company, position, job_location, status, job_type, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {JOB_COLUMNS}"
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(&draft.company)
            .bind(&draft.position)
            .bind(&draft.job_location)
            .bind(draft.status.as_str())
            .bind(draft.job_type.as_str())
            .bind(owner)
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;
        job_from_row(&row)
    }

    async fn list_jobs(&self, owner: Uuid) -> StoreResult<Vec<Job>> {
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE created_by = $1 ORDER BY created_at, id"
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let rows = sqlx::query(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;
        rows.iter().map(job_from_row).collect()
    }

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        row.as_ref().map(job_from_row).transpose()
    }

    async fn find_job_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Job>> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1 AND created_by = $2");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        row.as_ref().map(job_from_row).transpose()
    }

    async fn update_job(&self, id: Uuid, draft: &JobDraft) -> StoreResult<bool> {
        let query = r"
            UPDATE jobs
            SET company = $2,
                position = $3,
                job_location = $4,
                status = $5,
                job_type = $6
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(id)
            .bind(&draft.company)
            .bind(&draft.position)
            .bind(&draft.job_location)
            .bind(draft.status.as_str())
            .bind(draft.job_type.as_str())
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let query = "DELETE FROM jobs WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_jobs_by_status(&self, owner: Uuid) -> StoreResult<StatusCounts> {
        let query = r"
            SELECT status, COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY status
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(owner)
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        let mut counts = StatusCounts::default();
        for row in rows {
            let status: String = row.get("status");
            counts.add(status.parse::<JobStatus>()?, row.get("count"));
        }
        Ok(counts)
    }

    async fn monthly_applications(
        &self,
        owner: Uuid,
        months: u32,
    ) -> StoreResult<Vec<MonthlyCount>> {
        let query = r"
            SELECT EXTRACT(YEAR FROM created_at)::INT AS year,
                   EXTRACT(MONTH FROM created_at)::INT AS month,
                   COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY year, month
            ORDER BY year DESC, month DESC
            LIMIT $2
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(owner)
            .bind(i64::from(months))
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let month: i32 = row.get("month");
                MonthlyCount {
                    year: row.get("year"),
                    month: u32::try_from(month).unwrap_or_default(),
                    count: row.get("count"),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::{borrow::Cow, error::Error as StdError, fmt};

    #[test]
    fn schema_splits_into_statements() {
        let statements = split_sql_statements(SCHEMA_SQL);
        assert_eq!(statements.len(), 4);
        assert!(statements[0].starts_with("CREATE EXTENSION"));
        assert!(statements[1].contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(statements[2].contains("CREATE TABLE IF NOT EXISTS jobs"));
        assert!(statements.iter().all(|statement| statement.ends_with(';')));
    }

    #[test]
    fn split_keeps_unterminated_tail() {
        let statements = split_sql_statements("SELECT 1;\nSELECT 2");
        assert_eq!(statements, vec!["SELECT 1;".to_string(), "SELECT 2".to_string()]);
    }

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23503"),
        }));
        assert!(!is_unique_violation(&err));

        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
