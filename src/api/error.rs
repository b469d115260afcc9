//! Error taxonomy shared by every handler.
//!
//! Each variant maps to exactly one HTTP status and renders the JSON error
//! envelope. Server-side failures are logged here and never echo internals
//! back to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use super::handlers::auth::token::TokenError;
use super::response::ErrorResponse;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON")]
    MalformedBody,

    #[error("Please provide {0}")]
    MissingField(&'static str),

    #[error("Invalid {0}")]
    InvalidField(&'static str),

    #[error("Not Authorized")]
    Unauthorized(#[from] TokenError),

    #[error("Not Authorized")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not verified")]
    AccountNotVerified,

    #[error("You are not allowed to modify this job")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid verification token")]
    InvalidToken,

    #[error("User with this email already exists")]
    Conflict,

    #[error("Could not process password")]
    HashingFailure(String),

    #[error("Something went wrong")]
    Dependency(#[source] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody
            | Self::MissingField(_)
            | Self::InvalidField(_)
            | Self::InvalidToken => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_)
            | Self::MissingCredentials
            | Self::InvalidCredentials
            | Self::AccountNotVerified => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::HashingFailure(_) | Self::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing detail for the `error` field.
    fn detail(&self) -> String {
        match self {
            Self::Unauthorized(err) => err.to_string(),
            Self::MissingCredentials => "missing authorization header".to_string(),
            _ => String::new(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict,
            other => Self::Dependency(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Dependency(err) => error!("dependency failure: {err:#}"),
            Self::HashingFailure(err) => error!("password hashing failed: {err}"),
            _ => {}
        }

        let body = ErrorResponse {
            message: self.to_string(),
            response_code: status.as_u16(),
            error: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}
