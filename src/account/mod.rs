//! Accounts: validation, password hashing, storage and the signup/signin flows.

pub mod flow;
pub mod password;
pub mod store;
pub mod validate;

use std::fmt;
use uuid::Uuid;

pub use flow::{AuthError, AuthState};
pub use password::PasswordHasher;
pub use store::{AccountStore, MemoryAccountStore, PgAccountStore, StoreError};
pub use validate::{SigninInput, SignupInput, ValidationError};

/// A registered account as stored.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

// The hash stays out of logs.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Fields required to persist a new account; the store assigns the id.
#[derive(Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
