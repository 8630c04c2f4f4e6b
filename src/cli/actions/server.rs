use crate::{
    account::{AccountStore, AuthState, MemoryAccountStore, PasswordHasher, PgAccountStore},
    api,
    cli::{commands::store::Backend, telemetry},
};
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub backend: Backend,
    pub store_timeout_ms: u64,
    pub bcrypt_cost: u32,
    pub frontend_base_url: Option<String>,
}

async fn connect_store(backend: Backend) -> Result<Arc<dyn AccountStore>> {
    match backend {
        Backend::Postgres {
            dsn,
            max_connections,
        } => {
            let dsn = Url::parse(dsn.expose_secret()).context("Invalid database DSN")?;

            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(max_connections)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(dsn.as_str())
                .await
                .context("Failed to connect to database")?;

            let store = PgAccountStore::new(pool);
            store.ensure_schema().await?;

            info!("Using Postgres account store");

            Ok(Arc::new(store))
        }
        Backend::Memory => {
            warn!("Using in-memory account store, accounts are lost on restart");

            Ok(Arc::new(MemoryAccountStore::new()))
        }
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the store cannot be reached or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let hasher = PasswordHasher::new(args.bcrypt_cost)?;
    let cors = api::cors_layer(args.frontend_base_url.as_deref())?;
    let store = connect_store(args.backend).await?;

    let auth_state = Arc::new(
        AuthState::new(store, hasher)
            .with_store_timeout(Duration::from_millis(args.store_timeout_ms)),
    );

    let result = api::new(args.port, auth_state, cors).await;

    telemetry::shutdown_tracer();

    result
}
