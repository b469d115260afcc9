use axum::{extract::Extension, http::StatusCode, response::Response};
use tracing::instrument;

use super::SharedJobStore;
use crate::api::{
    error::ApiError,
    handlers::auth::CurrentUser,
    response::{respond, Envelope, ErrorResponse, StatsData},
};
use crate::models::MonthlyApplication;

/// Calendar months reported in `monthlyApplications`.
pub const STATS_MONTHS: u32 = 6;

#[utoipa::path(
    get,
    path = "/api/v1/jobs/stats",
    responses(
        (status = 200, description = "Per-status counts and recent monthly applications", body = Envelope<StatsData>),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
#[instrument(skip(store, caller), fields(user_id = %caller.id))]
pub async fn job_stats(
    store: Extension<SharedJobStore>,
    caller: Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let default_stats = store.count_jobs_by_status(caller.id).await?;

    // Store returns newest first; the chart reads left to right.
    let mut monthly = store.monthly_applications(caller.id, STATS_MONTHS).await?;
    monthly.reverse();
    let monthly_applications = monthly.into_iter().map(MonthlyApplication::from).collect();

    Ok(respond(
        StatusCode::OK,
        "Data retrieved successfully",
        StatsData {
            default_stats,
            monthly_applications,
        },
    ))
}
