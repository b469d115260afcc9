//! Registration, verification, login and profile orchestration.
//!
//! State machine per identity: `Unverified -> Verified`, one way, driven only
//! by a successful token match in [`verify_account`]. Login needs both a
//! correct password and a verified account; the two checks are independent.

use tracing::{error, info};
use uuid::Uuid;

use super::{
    password::{hash_password, verify_password},
    types::{LoginRequest, RegisterRequest, UpdateUserRequest},
    verification::{issue_verification_token, tokens_match},
    AuthState,
};
use crate::api::{
    email::{build_verify_link, welcome_message},
    error::ApiError,
    handlers::valid_email,
};
use crate::models::{NewUser, ProfileUpdate};

/// First empty field wins, in the order given. Text fields must hold more
/// than whitespace; a password only has to be non-empty.
fn require(fields: &[(&'static str, &str)]) -> Result<(), ApiError> {
    let blank = |name: &str, value: &str| match name {
        "password" => value.is_empty(),
        _ => value.trim().is_empty(),
    };
    match fields.iter().find(|&&(name, value)| blank(name, value)) {
        Some(&(name, _)) => Err(ApiError::MissingField(name)),
        None => Ok(()),
    }
}

/// Create an unverified identity and mail its verification link.
///
/// Email delivery is best-effort and never fails the registration.
///
/// # Errors
/// `MissingField`/`InvalidField` before any write, `Conflict` for a taken
/// email, `HashingFailure` or `Dependency` for server-side faults.
pub async fn register(state: &AuthState, request: RegisterRequest) -> Result<Uuid, ApiError> {
    require(&[
        ("firstName", request.first_name.as_str()),
        ("lastName", request.last_name.as_str()),
        ("email", request.email.as_str()),
        ("password", request.password.as_str()),
        ("location", request.location.as_str()),
    ])?;

    let email = request.email.trim().to_string();
    if !valid_email(&email) {
        return Err(ApiError::InvalidField("email"));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|err| ApiError::HashingFailure(err.to_string()))?;
    let token = issue_verification_token().map_err(ApiError::Dependency)?;

    let user_id = state
        .credentials()
        .insert_user(&NewUser {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: email.clone(),
            location: request.location.trim().to_string(),
            password_hash,
            verification_token: token.clone(),
        })
        .await?;

    info!(%user_id, "registered new account");

    let sent = build_verify_link(state.config().api_host_url(), &email, &token)
        .and_then(|link| welcome_message(&email, request.first_name.trim(), &link))
        .and_then(|message| state.mailer().send(&message));
    if let Err(err) = sent {
        error!(%user_id, "failed to send verification email: {err:#}");
    }

    Ok(user_id)
}

/// Consume a verification token.
///
/// # Errors
/// `MissingField` for empty inputs, `NotFound` for an unknown email,
/// `InvalidToken` when nothing is pending or the token does not match.
pub async fn verify_account(state: &AuthState, email: &str, token: &str) -> Result<(), ApiError> {
    require(&[("e", email), ("t", token)])?;

    let user = state
        .credentials()
        .find_user_by_email(email.trim())
        .await?
        .ok_or(ApiError::NotFound("Account"))?;

    let Some(stored) = user.pending_token() else {
        return Err(ApiError::InvalidToken);
    };
    if !tokens_match(token.trim(), stored) {
        return Err(ApiError::InvalidToken);
    }

    // Conditional write: a concurrent consume of the same token loses here.
    if !state.credentials().mark_verified(user.id, stored).await? {
        return Err(ApiError::InvalidToken);
    }

    info!(user_id = %user.id, "account verified");
    Ok(())
}

/// Check credentials and issue a session token.
///
/// # Errors
/// `InvalidCredentials` for an unknown email or wrong password,
/// `AccountNotVerified` for a correct password on an unverified account.
pub async fn login(state: &AuthState, request: LoginRequest) -> Result<String, ApiError> {
    require(&[("email", request.email.as_str()), ("password", request.password.as_str())])?;

    let user = state
        .credentials()
        .find_user_by_email(request.email.trim())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }
    if !user.is_verified {
        return Err(ApiError::AccountNotVerified);
    }

    state
        .codec()
        .issue(user.id, &user.email)
        .map_err(|err| ApiError::Dependency(err.into()))
}

/// Update the caller's own name and location.
///
/// # Errors
/// `MissingField` before any write, `NotFound` if the identity vanished.
pub async fn update_profile(
    state: &AuthState,
    caller: Uuid,
    request: UpdateUserRequest,
) -> Result<(), ApiError> {
    require(&[
        ("firstName", request.first_name.as_str()),
        ("lastName", request.last_name.as_str()),
        ("location", request.location.as_str()),
    ])?;

    let updated = state
        .credentials()
        .update_profile(
            caller,
            &ProfileUpdate {
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                location: request.location.trim().to_string(),
            },
        )
        .await?;

    if updated {
        Ok(())
    } else {
        Err(ApiError::NotFound("Account"))
    }
}
