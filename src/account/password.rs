//! Password hashing and verification (bcrypt).

use anyhow::{Context, Result, anyhow};
use secrecy::{ExposeSecret, SecretString};

/// Default bcrypt work factor.
pub const DEFAULT_COST: u32 = 12;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt hasher with a configurable cost.
///
/// bcrypt is CPU bound, so both operations run on the blocking thread pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    /// # Errors
    /// Returns an error if `cost` is outside bcrypt's accepted range.
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(anyhow!(
                "bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {cost}"
            ));
        }
        Ok(Self { cost })
    }

    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    /// Returns an error if hashing fails or the blocking task panics.
    pub async fn hash(&self, password: &SecretString) -> Result<String> {
        let password = SecretString::from(password.expose_secret().to_string());
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password.expose_secret(), cost))
            .await
            .context("password hashing task failed")?
            .context("failed to hash password")
    }

    /// Compare a password against a stored hash.
    ///
    /// # Errors
    /// Returns an error if the stored hash is malformed or the blocking task panics.
    pub async fn verify(&self, password: &SecretString, stored_hash: &str) -> Result<bool> {
        let password = SecretString::from(password.expose_secret().to_string());
        let stored_hash = stored_hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password.expose_secret(), &stored_hash))
            .await
            .context("password verification task failed")?
            .context("failed to verify password")
    }
}
