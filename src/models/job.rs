//! Job records, the closed status/type vocabularies, and stats aggregates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Raised when a stored or submitted value is outside a closed vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Where an application currently stands.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Accepted,
    Declined,
}

impl JobStatus {
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Interview,
        Self::Accepted,
        Self::Declined,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Interview => "interview",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = UnknownVariant;

    // Case-insensitive: older clients send "Accepted".
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownVariant {
                kind: "job status",
                value: value.to_string(),
            })
    }
}

/// Employment arrangement of a job.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub const ALL: [Self; 5] = [
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Internship,
        Self::Remote,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "Full-Time",
            Self::PartTime => "Part-Time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
            Self::Remote => "Remote",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|job_type| job_type.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownVariant {
                kind: "job type",
                value: value.to_string(),
            })
    }
}

/// A stored job application. `created_by` is set once at creation.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub job_location: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Validated, owner-independent job fields used for inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub company: String,
    pub position: String,
    pub job_location: String,
    pub status: JobStatus,
    pub job_type: JobType,
}

/// Per-status job counts for one owner. Every status is always present.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: i64,
    pub interview: i64,
    pub accepted: i64,
    pub declined: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: JobStatus, count: i64) {
        match status {
            JobStatus::Pending => self.pending += count,
            JobStatus::Interview => self.interview += count,
            JobStatus::Accepted => self.accepted += count,
            JobStatus::Declined => self.declined += count,
        }
    }
}

/// Number of applications created in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub count: i64,
}

impl MonthlyCount {
    /// Month label such as `Jan 2024`.
    #[must_use]
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).map_or_else(
            || format!("{:02}/{}", self.month, self.year),
            |date| date.format("%b %Y").to_string(),
        )
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MonthlyApplication {
    pub date: String,
    pub count: i64,
}

impl From<MonthlyCount> for MonthlyApplication {
    fn from(value: MonthlyCount) -> Self {
        Self {
            date: value.label(),
            count: value.count,
        }
    }
}
