use crate::api::handlers::auth::token::MIN_SECRET_LEN;
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_API_HOST_URL: &str = "api-host-url";

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub api_host_url: String,
}

impl Options {
    /// Parse auth arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the JWT secret is missing or shorter than
    /// `MIN_SECRET_LEN` bytes.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_JWT_SECRET}"))?;

        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("--{ARG_JWT_SECRET} must be at least {MIN_SECRET_LEN} bytes");
        }

        let api_host_url = matches
            .get_one::<String>(ARG_API_HOST_URL)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_API_HOST_URL}"))?;

        Ok(Self {
            jwt_secret: SecretString::from(secret.clone()),
            api_host_url,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign session tokens (HS256, at least 32 bytes)")
                .env("JOBSTAR_JWT_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_API_HOST_URL)
                .long(ARG_API_HOST_URL)
                .help("Public base URL of this API, used in verification links")
                .env("JOBSTAR_API_HOST_URL")
                .default_value("http://localhost:8080"),
        )
}
