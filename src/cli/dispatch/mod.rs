//! Map validated CLI arguments to an action.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{auth, store};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let store_opts = store::Options::parse(matches)?;
    let auth_opts = auth::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        backend: store_opts.backend,
        store_timeout_ms: store_opts.timeout_ms,
        bcrypt_cost: auth_opts.bcrypt_cost,
        frontend_base_url: auth_opts.frontend_base_url,
    }))
}
