//! Job request payload and its validation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::models::{JobDraft, JobStatus, JobType};

/// Body for job create and update. Fields default to empty so validation can
/// name the first missing one.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRequest {
    pub company: String,
    pub position: String,
    pub job_location: String,
    /// One of `Full-Time`, `Part-Time`, `Contract`, `Internship`, `Remote`.
    pub job_type: String,
    /// One of `pending`, `interview`, `accepted`, `declined`; defaults to `pending`.
    pub status: String,
}

impl JobRequest {
    /// Check fields in order: company, jobLocation, position, jobType, status.
    ///
    /// # Errors
    /// `MissingField` or `InvalidField` naming the first offending field.
    pub fn validate(self) -> Result<JobDraft, ApiError> {
        let company = required("company", &self.company)?;
        let job_location = required("jobLocation", &self.job_location)?;
        let position = required("position", &self.position)?;
        let job_type = required("jobType", &self.job_type)?
            .parse::<JobType>()
            .map_err(|_| ApiError::InvalidField("jobType"))?;

        let status = if self.status.trim().is_empty() {
            JobStatus::default()
        } else {
            self.status
                .parse::<JobStatus>()
                .map_err(|_| ApiError::InvalidField("status"))?
        };

        Ok(JobDraft {
            company,
            position,
            job_location,
            status,
            job_type,
        })
    }
}

fn required(name: &'static str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::MissingField(name))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JobRequest {
        JobRequest {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            job_location: "Berlin".to_string(),
            job_type: "Full-Time".to_string(),
            status: String::new(),
        }
    }

    #[test]
    fn validate_defaults_status_to_pending() -> anyhow::Result<()> {
        let draft = request().validate()?;
        assert_eq!(draft.status, JobStatus::Pending);
        assert_eq!(draft.job_type, JobType::FullTime);
        assert_eq!(draft.company, "Acme");
        Ok(())
    }

    #[test]
    fn validate_checks_fields_in_order() {
        let all_missing = JobRequest::default().validate();
        assert!(matches!(all_missing, Err(ApiError::MissingField("company"))));

        let no_location = JobRequest {
            job_location: String::new(),
            position: String::new(),
            ..request()
        }
        .validate();
        assert!(matches!(
            no_location,
            Err(ApiError::MissingField("jobLocation"))
        ));

        let no_position = JobRequest {
            position: String::new(),
            ..request()
        }
        .validate();
        assert!(matches!(no_position, Err(ApiError::MissingField("position"))));

        let no_type = JobRequest {
            job_type: String::new(),
            status: "bogus".to_string(),
            ..request()
        }
        .validate();
        assert!(matches!(no_type, Err(ApiError::MissingField("jobType"))));
    }

    #[test]
    fn validate_rejects_values_outside_vocabulary() {
        let bad_type = JobRequest {
            job_type: "Freelance".to_string(),
            status: "bogus".to_string(),
            ..request()
        }
        .validate();
        assert!(matches!(bad_type, Err(ApiError::InvalidField("jobType"))));

        let bad_status = JobRequest {
            status: "hired".to_string(),
            ..request()
        }
        .validate();
        assert!(matches!(bad_status, Err(ApiError::InvalidField("status"))));
    }
}
