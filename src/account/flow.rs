//! Signup and signin orchestration.
//!
//! Both flows are linear: validate, look up by normalized email, then hash and
//! persist (signup) or verify (signin). Every store call and every bcrypt call
//! is bounded by the configured timeout; an elapsed timeout is an internal
//! error like any other infrastructure failure.

use anyhow::anyhow;
use std::{future::Future, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::{
    Account, AccountStore, NewAccount, PasswordHasher, StoreError, ValidationError,
    validate::{validate_signin, validate_signup},
};

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Email is already registered")]
    EmailAlreadyRegistered,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            // only `create_account` reports this: a concurrent signup won
            StoreError::DuplicateEmail => Self::EmailAlreadyRegistered,
            StoreError::Unavailable(e) => Self::Internal(e),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Shared, immutable state for the auth flows.
pub struct AuthState {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    store_timeout: Duration,
}

impl AuthState {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher) -> Self {
        Self {
            store,
            hasher,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    #[must_use]
    pub fn store(&self) -> &dyn AccountStore {
        self.store.as_ref()
    }

    #[must_use]
    pub const fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    async fn within<T, E>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, E>>,
    ) -> Result<T, AuthError>
    where
        E: Into<AuthError>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(AuthError::Internal(anyhow!(
                "{operation} timed out after {:?}",
                self.store_timeout
            ))),
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// Validation failures, `EmailAlreadyRegistered`, or `Internal` for store,
    /// hashing and timeout failures.
    #[instrument(skip_all)]
    pub async fn signup(
        &self,
        name: Option<&str>,
        password: Option<&str>,
        email: Option<&str>,
    ) -> Result<Account, AuthError> {
        let input = validate_signup(name, password, email)?;

        let existing = self
            .within("account lookup", self.store.find_by_email(&input.email))
            .await?;
        if existing.is_some() {
            debug!("Email already registered");
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = self
            .within("password hashing", self.hasher.hash(&input.password))
            .await?;

        let account = self
            .within(
                "account insert",
                self.store.create_account(NewAccount {
                    name: input.name,
                    email: input.email,
                    password_hash,
                }),
            )
            .await?;

        info!(account.id = %account.id, "Account created");

        Ok(account)
    }

    /// Authenticate an existing account.
    ///
    /// # Errors
    /// Validation failures, `UserNotFound`, `InvalidPassword`, or `Internal`.
    #[instrument(skip_all)]
    pub async fn signin(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Account, AuthError> {
        let input = validate_signin(email, password)?;

        let Some(account) = self
            .within("account lookup", self.store.find_by_email(&input.email))
            .await?
        else {
            debug!("User not found");
            return Err(AuthError::UserNotFound);
        };

        let matches = self
            .within(
                "password verification",
                self.hasher.verify(&input.password, &account.password_hash),
            )
            .await?;
        if !matches {
            debug!(account.id = %account.id, "Invalid password");
            return Err(AuthError::InvalidPassword);
        }

        info!(account.id = %account.id, "Signin successful");

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccountStore;
    use async_trait::async_trait;

    fn state() -> (Arc<MemoryAccountStore>, AuthState) {
        let store = Arc::new(MemoryAccountStore::new());
        let hasher = PasswordHasher::new(4).unwrap_or_default();
        (Arc::clone(&store), AuthState::new(store, hasher))
    }

    struct StalledStore;

    #[async_trait]
    impl AccountStore for StalledStore {
        async fn find_by_email(&self, _email: &str) -> Result<Option<Account>, StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn create_account(&self, _account: NewAccount) -> Result<Account, StoreError> {
            Err(StoreError::Unavailable(anyhow!("unreachable")))
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn signup_then_signin() -> Result<(), AuthError> {
        let (store, state) = state();

        let created = state
            .signup(Some(" Jo "), Some("longenough1"), Some("jo@x.com"))
            .await?;
        assert_eq!(created.name, "Jo");
        assert_eq!(created.email, "jo@x.com");
        assert_ne!(created.password_hash, "longenough1");

        let signed_in = state.signin(Some("JO@X.COM"), Some("longenough1")).await?;
        assert_eq!(signed_in, created);
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn signup_rejects_normalized_duplicate() -> Result<(), AuthError> {
        let (store, state) = state();
        state
            .signup(Some("A"), Some("longenough1"), Some("a@b.com"))
            .await?;

        let result = state
            .signup(Some("B"), Some("longenough1"), Some("A@B.com "))
            .await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyRegistered)));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn signin_reports_unknown_email_and_wrong_password() -> Result<(), AuthError> {
        let (_store, state) = state();
        state
            .signup(Some("Jo"), Some("longenough1"), Some("jo@x.com"))
            .await?;

        let unknown = state.signin(Some("nobody@x.com"), Some("longenough1")).await;
        assert!(matches!(unknown, Err(AuthError::UserNotFound)));

        let wrong = state.signin(Some("jo@x.com"), Some("longenough2")).await;
        assert!(matches!(wrong, Err(AuthError::InvalidPassword)));
        Ok(())
    }

    #[tokio::test]
    async fn validation_failure_skips_store() {
        let (store, state) = state();
        let result = state.signup(Some("Jo"), Some("short"), Some("jo@x.com")).await;
        assert!(matches!(
            result,
            Err(AuthError::Validation(ValidationError::WeakPassword))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn stalled_store_times_out_as_internal() {
        let state = AuthState::new(Arc::new(StalledStore), PasswordHasher::default())
            .with_store_timeout(Duration::from_millis(50));

        let result = state.signin(Some("jo@x.com"), Some("longenough1")).await;
        match result {
            Err(AuthError::Internal(err)) => assert!(err.to_string().contains("timed out")),
            other => panic!("expected internal timeout, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_email_maps_to_business_error() {
        assert!(matches!(
            AuthError::from(StoreError::DuplicateEmail),
            AuthError::EmailAlreadyRegistered
        ));
        assert!(matches!(
            AuthError::from(StoreError::Unavailable(anyhow!("down"))),
            AuthError::Internal(_)
        ));
    }
}
