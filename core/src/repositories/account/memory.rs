//! In-memory account directory for development and testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use bh_shared::utils::email::normalize_email;

use crate::domain::entities::account::{Account, UserId};
use crate::errors::DomainError;

use super::trait_::{AccountStore, Directory};

/// In-memory directory and account store
#[derive(Clone, Default)]
pub struct InMemoryAccountDirectory {
    accounts: Arc<RwLock<HashMap<UserId, Account>>>,
    should_fail: Arc<AtomicBool>,
}

impl InMemoryAccountDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account; the address is normalized before storage
    pub async fn insert_account(&self, id: UserId, email: &str) -> Account {
        let account = Account::new(id, normalize_email(email));
        self.accounts.write().await.insert(id, account.clone());
        account
    }

    /// Fetch a stored account
    pub async fn account(&self, id: UserId) -> Option<Account> {
        self.accounts.read().await.get(&id).cloned()
    }

    /// Make every subsequent call fail with a store error
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::store("account directory unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl Directory for InMemoryAccountDirectory {
    async fn resolve_user_id_by_address(
        &self,
        address: &str,
    ) -> Result<Option<UserId>, DomainError> {
        self.check_available()?;
        let address = normalize_email(address);
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.email == address)
            .map(|account| account.id))
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountDirectory {
    async fn account_exists(&self, user_id: UserId) -> Result<bool, DomainError> {
        self.check_available()?;
        Ok(self.accounts.read().await.contains_key(&user_id))
    }

    async fn get_password_hash(&self, user_id: UserId) -> Result<Option<String>, DomainError> {
        self.check_available()?;
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(&user_id)
            .and_then(|account| account.password_hash.clone()))
    }

    async fn set_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        self.check_available()?;
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&user_id) {
            Some(account) => {
                account.password_hash = Some(password_hash.to_string());
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: format!("account {}", user_id),
            }),
        }
    }
}
