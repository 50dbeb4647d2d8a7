use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, NewAccount};
use crate::database::repository::AccountStore;

/// Process-local account store, keyed by email.
///
/// Used for `--in-memory` runs and tests. The duplicate check and the write
/// happen under one write lock, which plays the role of the unique index.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    pub async fn get(&self, email: &str) -> Option<Account> {
        self.accounts.read().await.get(email).cloned()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        Ok(self.get(email).await)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(DatabaseError::DuplicateEmail);
        }

        let stored = account.into_account(Uuid::new_v4(), Utc::now());
        accounts.insert(stored.email.clone(), stored.clone());
        Ok(stored)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
