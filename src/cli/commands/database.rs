use clap::{Arg, ArgMatches, Command};

pub const ARG_DB_MAX_CONNECTIONS: &str = "db-max-connections";
pub const ARG_DB_MIN_CONNECTIONS: &str = "db-min-connections";

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Options {
    /// Parse pool sizing from matches.
    ///
    /// # Errors
    /// Returns an error if the minimum exceeds the maximum.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let max_connections = matches
            .get_one::<u32>(ARG_DB_MAX_CONNECTIONS)
            .copied()
            .unwrap_or(10);
        let min_connections = matches
            .get_one::<u32>(ARG_DB_MIN_CONNECTIONS)
            .copied()
            .unwrap_or(5);

        if min_connections > max_connections {
            anyhow::bail!(
                "--{ARG_DB_MIN_CONNECTIONS} ({min_connections}) exceeds --{ARG_DB_MAX_CONNECTIONS} ({max_connections})"
            );
        }

        Ok(Self {
            max_connections,
            min_connections,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DB_MAX_CONNECTIONS)
                .long(ARG_DB_MAX_CONNECTIONS)
                .help("Maximum database pool connections")
                .env("JOBSTAR_DB_MAX_CONNECTIONS")
                .default_value("10")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_DB_MIN_CONNECTIONS)
                .long(ARG_DB_MIN_CONNECTIONS)
                .help("Minimum idle database pool connections")
                .env("JOBSTAR_DB_MIN_CONNECTIONS")
                .default_value("5")
                .value_parser(clap::value_parser!(u32)),
        )
}
