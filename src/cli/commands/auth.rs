use crate::account::password::{DEFAULT_COST, MAX_COST, MIN_COST};
use clap::{Arg, ArgMatches, Command};

pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";

#[derive(Debug)]
pub struct Options {
    pub bcrypt_cost: u32,
    pub frontend_base_url: Option<String>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            bcrypt_cost: matches
                .get_one::<u32>(ARG_BCRYPT_COST)
                .copied()
                .unwrap_or(DEFAULT_COST),
            frontend_base_url: matches.get_one::<String>(ARG_FRONTEND_BASE_URL).cloned(),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long("bcrypt-cost")
                .help("bcrypt work factor used when hashing new passwords")
                .env("AUTHGATE_BCRYPT_COST")
                .default_value("12")
                .value_parser(clap::value_parser!(u32).range(i64::from(MIN_COST)..=i64::from(MAX_COST))),
        )
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long("frontend-base-url")
                .help("Frontend base URL allowed by CORS (any origin when unset)")
                .env("AUTHGATE_FRONTEND_BASE_URL"),
        )
}
