//! Account persistence behind the [`AccountStore`] trait.
//!
//! Lookups are exact matches on the normalized email. `create_account` must be
//! atomic with respect to email uniqueness: two concurrent creates for the same
//! email yield one account and one [`StoreError::DuplicateEmail`].

use async_trait::async_trait;
use thiserror::Error;

use super::{Account, NewAccount};

mod memory;
mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::{PgAccountStore, SCHEMA_SQL};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Persist a new account and return it with its store-assigned id.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
