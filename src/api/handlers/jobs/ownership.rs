//! The single ownership rule: only a job's creator may mutate it.

use uuid::Uuid;

use crate::api::error::ApiError;
use crate::models::Job;

#[must_use]
pub fn can_mutate(job: &Job, caller: Uuid) -> bool {
    job.created_by == caller
}

/// # Errors
/// Returns [`ApiError::Forbidden`] when `caller` did not create `job`.
pub fn ensure_can_mutate(job: &Job, caller: Uuid) -> Result<(), ApiError> {
    if can_mutate(job, caller) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStatus, JobType};
    use chrono::Utc;

    fn job_owned_by(owner: Uuid) -> Job {
        Job {
            id: Uuid::now_v7(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            job_location: "Berlin".to_string(),
            status: JobStatus::Pending,
            job_type: JobType::Remote,
            created_by: owner,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_creator_may_mutate() {
        let owner = Uuid::now_v7();
        let job = job_owned_by(owner);
        assert!(can_mutate(&job, owner));
        assert!(ensure_can_mutate(&job, owner).is_ok());

        for _ in 0..8 {
            let other = Uuid::new_v4();
            assert!(!can_mutate(&job, other));
            assert!(matches!(
                ensure_can_mutate(&job, other),
                Err(ApiError::Forbidden)
            ));
        }
    }
}
