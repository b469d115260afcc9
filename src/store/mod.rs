//! Persistence seams for identities and jobs.
//!
//! Handlers only see the [`CredentialStore`] and [`JobStore`] traits. The
//! server wires in [`PgStore`]; router tests and local experiments use
//! [`MemoryStore`]. Each method is one logical, row-atomic operation.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Job, JobDraft, MonthlyCount, NewUser, ProfileUpdate, StatusCounts, UnknownVariant, UserRecord,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint (e.g. `users.email`) rejected the write.
    #[error("unique constraint violated")]
    Conflict,

    #[error("invalid stored value: {0}")]
    Corrupt(#[from] UnknownVariant),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Identity persistence.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Cheap liveness probe used by `/health`.
    async fn ping(&self) -> StoreResult<()>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    /// Insert an unverified identity and return its id.
    ///
    /// Fails with [`StoreError::Conflict`] when the email is already taken.
    async fn insert_user(&self, user: &NewUser) -> StoreResult<Uuid>;

    /// Returns `false` when no identity has that id.
    async fn update_profile(&self, id: Uuid, profile: &ProfileUpdate) -> StoreResult<bool>;

    /// Flip the identity to verified and clear its token, but only while
    /// `token` is still the stored one. Returns `false` if it was not.
    async fn mark_verified(&self, id: Uuid, token: &str) -> StoreResult<bool>;
}

/// Job persistence. Reads by id are never owner-scoped here unless the
/// method says so; ownership is decided by the caller.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, owner: Uuid, draft: &JobDraft) -> StoreResult<Job>;

    /// All jobs created by `owner`, oldest first.
    async fn list_jobs(&self, owner: Uuid) -> StoreResult<Vec<Job>>;

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>>;

    async fn find_job_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Job>>;

    /// Overwrite the mutable fields. `created_by` and `created_at` never change.
    async fn update_job(&self, id: Uuid, draft: &JobDraft) -> StoreResult<bool>;

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool>;

    async fn count_jobs_by_status(&self, owner: Uuid) -> StoreResult<StatusCounts>;

    /// Up to `months` calendar months that have applications, newest first.
    async fn monthly_applications(&self, owner: Uuid, months: u32)
        -> StoreResult<Vec<MonthlyCount>>;
}
