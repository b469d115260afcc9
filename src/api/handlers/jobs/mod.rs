//! Job endpoints. Every route here sits behind the bearer gate.
//!
//! Reads are scoped to the caller. Updates and deletes fetch the job by id
//! alone, then apply [`ownership::ensure_can_mutate`], so a missing job is
//! `404` and someone else's job is `403`.

pub mod crud;
pub mod ownership;
pub mod stats;
pub(crate) mod types;

use std::sync::Arc;

use crate::store::JobStore;

pub type SharedJobStore = Arc<dyn JobStore>;

#[cfg(test)]
mod tests;
