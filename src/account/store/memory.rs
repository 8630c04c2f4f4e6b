use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::account::{Account, NewAccount};

/// Volatile in-process store keyed by normalized email.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        // check and insert under the same write guard
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let created = Account {
            id: Uuid::new_v4(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
        };
        accounts.insert(created.email.clone(), created.clone());

        Ok(created)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Jo".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find() -> Result<(), StoreError> {
        let store = MemoryAccountStore::new();
        assert!(store.find_by_email("jo@x.com").await?.is_none());

        let created = store.create_account(new_account("jo@x.com")).await?;
        let found = store.find_by_email("jo@x.com").await?;

        assert_eq!(found, Some(created));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() -> Result<(), StoreError> {
        let store = MemoryAccountStore::new();
        store.create_account(new_account("jo@x.com")).await?;

        let result = store.create_account(new_account("jo@x.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail)));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_yield_one_account() {
        let store = Arc::new(MemoryAccountStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create_account(new_account("race@x.com")).await
            }));
        }

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => created += 1,
                Ok(Err(StoreError::DuplicateEmail)) => duplicates += 1,
                other => panic!("unexpected result: {other:?}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 15);
    }

    #[tokio::test]
    async fn ids_are_distinct() -> Result<(), StoreError> {
        let store = MemoryAccountStore::new();
        let a = store.create_account(new_account("a@x.com")).await?;
        let b = store.create_account(new_account("b@x.com")).await?;
        assert_ne!(a.id, b.id);
        Ok(())
    }
}
