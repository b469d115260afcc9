use axum::{extract::Extension, http::StatusCode, response::Response, Json};
use std::sync::Arc;
use tracing::instrument;

use super::{flow, types::RegisterRequest, AuthState};
use crate::api::{
    error::ApiError,
    response::{respond_empty, Envelope, ErrorResponse, NoData},
};

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = Envelope<NoData>),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Server-side failure", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(auth_state, payload))]
pub async fn register(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::MalformedBody);
    };
    flow::register(&auth_state, request).await?;
    Ok(respond_empty(StatusCode::CREATED, "Registration Successful"))
}
