use axum::{extract::Extension, http::StatusCode, response::Response, Json};
use std::sync::Arc;
use tracing::instrument;

use super::{flow, gate::CurrentUser, types::UpdateUserRequest, AuthState};
use crate::api::{
    error::ApiError,
    response::{respond_empty, Envelope, ErrorResponse, NoData},
};

#[utoipa::path(
    patch,
    path = "/api/v1/auth/updateUser",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = Envelope<NoData>),
        (status = 400, description = "Missing field", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
#[instrument(skip(auth_state, caller, payload), fields(user_id = %caller.id))]
pub async fn update_user(
    auth_state: Extension<Arc<AuthState>>,
    caller: Extension<CurrentUser>,
    payload: Option<Json<UpdateUserRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::MalformedBody);
    };
    flow::update_profile(&auth_state, caller.id, request).await?;
    Ok(respond_empty(StatusCode::OK, "User details updated successfully"))
}
