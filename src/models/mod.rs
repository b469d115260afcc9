//! Domain records shared by the stores and the HTTP handlers.

pub mod job;
pub mod user;

pub use job::{
    Job, JobDraft, JobStatus, JobType, MonthlyApplication, MonthlyCount, StatusCounts,
    UnknownVariant,
};
pub use user::{NewUser, ProfileUpdate, UserRecord};
