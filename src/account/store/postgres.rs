use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Connection, PgPool, Row, postgres::PgRow};
use tracing::{Instrument, info_span};

use super::{AccountStore, StoreError};
use crate::account::{Account, NewAccount};

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// Postgres-backed store; `accounts.email` carries a unique constraint.
#[derive(Clone, Debug)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `accounts` table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the schema statements fail.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        let span = info_span!("db.migrate", db.system = "postgresql");
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to apply accounts schema")?;
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let query = "SELECT id, name, email, password_hash FROM accounts WHERE email = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup account")?;

        Ok(row.as_ref().map(account_from_row))
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let query = r"
            INSERT INTO accounts
                (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(account_from_row(&row)),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateEmail),
            Err(err) => Err(anyhow::Error::new(err)
                .context("failed to insert account")
                .into()),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("failed to acquire database connection")?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("failed to ping database")?;

        Ok(())
    }
}
