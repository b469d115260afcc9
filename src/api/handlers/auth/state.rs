//! Auth state and configuration.

use std::sync::Arc;

use super::token::SessionCodec;
use crate::api::email::EmailSender;
use crate::store::CredentialStore;

const DEFAULT_API_HOST_URL: &str = "http://localhost:8080";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    api_host_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(api_host_url: String) -> Self {
        Self {
            api_host_url: api_host_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public base URL used to build verification links.
    #[must_use]
    pub fn api_host_url(&self) -> &str {
        &self.api_host_url
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_HOST_URL.to_string())
    }
}

/// Everything the auth handlers and the gate need, shared behind an `Arc`.
pub struct AuthState {
    config: AuthConfig,
    codec: SessionCodec,
    credentials: Arc<dyn CredentialStore>,
    mailer: Arc<dyn EmailSender>,
}

impl AuthState {
    pub fn new(
        config: AuthConfig,
        codec: SessionCodec,
        credentials: Arc<dyn CredentialStore>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            config,
            codec,
            credentials,
            mailer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    #[must_use]
    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn mailer(&self) -> &dyn EmailSender {
        self.mailer.as_ref()
    }
}
