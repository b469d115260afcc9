//! Map validated CLI arguments to an [`Action`].

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, database, ARG_DSN, ARG_PORT};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    let db_opts = database::Options::parse(matches)?;
    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        db_max_connections: db_opts.max_connections,
        db_min_connections: db_opts.min_connections,
        api_host_url: auth_opts.api_host_url,
        jwt_secret: auth_opts.jwt_secret,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const DSN: &str = "postgres://user@localhost:5432/jobstar";

    #[test]
    fn jwt_secret_required() {
        temp_env::with_vars(
            [
                ("JOBSTAR_JWT_SECRET", None::<&str>),
                ("JOBSTAR_DSN", Some(DSN)),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["jobstar"]);
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(err
                        .to_string()
                        .contains("missing required argument: --jwt-secret"));
                }
            },
        );
    }

    #[test]
    fn builds_server_action() {
        temp_env::with_vars(
            [
                ("JOBSTAR_JWT_SECRET", Some("0123456789abcdef0123456789abcdef")),
                ("JOBSTAR_DSN", Some(DSN)),
                ("JOBSTAR_PORT", None),
                ("JOBSTAR_API_HOST_URL", None),
                ("JOBSTAR_DB_MAX_CONNECTIONS", None),
                ("JOBSTAR_DB_MIN_CONNECTIONS", None),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["jobstar"]);
                let Ok(Action::Server(args)) = handler(&matches) else {
                    panic!("expected server action");
                };
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, DSN);
                assert_eq!(args.db_max_connections, 10);
                assert_eq!(args.db_min_connections, 5);
                assert_eq!(args.api_host_url, "http://localhost:8080");
                assert_eq!(
                    args.jwt_secret.expose_secret(),
                    "0123456789abcdef0123456789abcdef"
                );
            },
        );
    }
}
