//! Bearer token gate for protected routes.
//!
//! Reads the `Authorization` header, validates the session token, and injects
//! a [`CurrentUser`] into the request extensions. Any failure short-circuits
//! with `401` before the handler runs. No I/O happens here.

use axum::{
    extract::{Extension, Request},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::AuthState;
use crate::api::error::ApiError;

/// Identity resolved from a valid session token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Extract the token from `Authorization`, accepting a raw token or a
/// `Bearer ` prefixed one.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Middleware applied with `axum::middleware::from_fn` as a route layer.
///
/// # Errors
/// Returns `401` when the header is missing or the token does not validate.
pub async fn authenticate(
    auth_state: Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(ApiError::MissingCredentials)?;

    let claims = auth_state.codec().validate(token).map_err(|err| {
        debug!("rejected session token: {err}");
        ApiError::Unauthorized(err)
    })?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
