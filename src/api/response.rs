//! JSON envelopes returned by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Job, MonthlyApplication, StatusCounts};

/// Success envelope: `{ message, response_code, data }`.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Envelope<T> {
    pub message: String,
    pub response_code: u16,
    pub data: Option<T>,
}

/// Error envelope: `{ message, response_code, error }`.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub message: String,
    pub response_code: u16,
    pub error: String,
}

/// Placeholder payload for envelopes that carry `"data": null`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct NoData {}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginData {
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct JobData {
    pub job: Job,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct JobsData {
    pub jobs: Vec<Job>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub default_stats: StatusCounts,
    pub monthly_applications: Vec<MonthlyApplication>,
}

/// Build a success response with a payload.
pub fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (
        status,
        Json(Envelope {
            message: message.to_string(),
            response_code: status.as_u16(),
            data: Some(data),
        }),
    )
        .into_response()
}

/// Build a success response whose `data` is `null`.
pub fn respond_empty(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(Envelope::<NoData> {
            message: message.to_string(),
            response_code: status.as_u16(),
            data: None,
        }),
    )
        .into_response()
}
