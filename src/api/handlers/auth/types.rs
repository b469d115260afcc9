//! Request types for auth endpoints.
//!
//! Every field defaults to empty so a missing key is reported as a named
//! validation failure instead of a body rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub location: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub location: String,
}
