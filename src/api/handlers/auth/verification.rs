//! Email verification tokens and the `verifyAccount` endpoint.
//!
//! Flow Overview: registration issues an 80 hex character token, stores it on
//! the identity, and mails a link carrying `e=<email>&t=<token>`. Following the
//! link compares the presented token with the stored one in constant time and,
//! on a match, flips the identity to verified and clears the token so the same
//! link cannot be replayed.

use anyhow::{Context, Result};
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::Response,
};
use rand::{rngs::OsRng, RngCore};
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::instrument;
use utoipa::IntoParams;

use super::{flow, AuthState};
use crate::api::{
    error::ApiError,
    response::{respond_empty, ErrorResponse, Envelope, NoData},
};

/// Random bytes per token; hex encoding doubles the length.
const TOKEN_BYTES: usize = 40;

/// Create a new verification token for email links.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn issue_verification_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate verification token")?;
    Ok(hex::encode(bytes))
}

/// Constant-time comparison; empty tokens never match.
#[must_use]
pub fn tokens_match(presented: &str, stored: &str) -> bool {
    if presented.is_empty() || stored.is_empty() {
        return false;
    }
    presented.as_bytes().ct_eq(stored.as_bytes()).into()
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyAccountQuery {
    /// Account email.
    #[serde(default)]
    pub e: String,
    /// Verification token from the email link.
    #[serde(default)]
    pub t: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verifyAccount",
    params(VerifyAccountQuery),
    responses(
        (status = 200, description = "Account verified", body = Envelope<NoData>),
        (status = 400, description = "Missing parameters or token mismatch", body = ErrorResponse),
        (status = 404, description = "No account with that email", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(auth_state, query))]
pub async fn verify_account(
    auth_state: Extension<Arc<AuthState>>,
    query: Option<Query<VerifyAccountQuery>>,
) -> Result<Response, ApiError> {
    let Some(Query(query)) = query else {
        return Err(ApiError::MissingField("e"));
    };
    flow::verify_account(&auth_state, &query.e, &query.t).await?;
    Ok(respond_empty(StatusCode::OK, "Account verified successfully"))
}
