use axum::{extract::Extension, http::StatusCode, response::Response, Json};
use std::sync::Arc;
use tracing::instrument;

use super::{flow, types::LoginRequest, AuthState};
use crate::api::{
    error::ApiError,
    response::{respond, Envelope, ErrorResponse, LoginData},
};

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = Envelope<LoginData>),
        (status = 400, description = "Missing field", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or account not verified", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(auth_state, payload))]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::MalformedBody);
    };
    let token = flow::login(&auth_state, request).await?;
    Ok(respond(StatusCode::OK, "Login Successful", LoginData { token }))
}
