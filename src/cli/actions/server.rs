use crate::{api, api::handlers::auth::AuthConfig, cli::telemetry};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub api_host_url: String,
    pub jwt_secret: SecretString,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!(
        port = args.port,
        api_host_url = %args.api_host_url,
        "starting server"
    );

    let result = api::new(
        args.port,
        args.dsn,
        args.db_max_connections,
        args.db_min_connections,
        AuthConfig::new(args.api_host_url),
        args.jwt_secret,
    )
    .await;

    telemetry::shutdown_tracer();

    result
}
