use uuid::Uuid;

/// Stored identity. `password_hash` is always a PHC-formatted Argon2 digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
    pub password_hash: String,
    pub is_verified: bool,
    /// Pending email verification token; `None` once consumed.
    pub verification_token: Option<String>,
}

impl UserRecord {
    /// The token still waiting to be consumed, if any.
    #[must_use]
    pub fn pending_token(&self) -> Option<&str> {
        self.verification_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// Fields persisted at registration; new identities always start unverified.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
    pub password_hash: String,
    pub verification_token: String,
}

#[derive(Clone, Debug)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub location: String,
}
