//! In-memory `UserAccountRepository`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::UserAccount;
use crate::domain::ports::{UserAccountRepository, UserAccountRepositoryError};

#[derive(Debug, Default)]
pub struct InMemoryUserAccountRepository {
    accounts: Mutex<HashMap<String, UserAccount>>,
}

impl InMemoryUserAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `accounts`.
    pub fn with_accounts(accounts: impl IntoIterator<Item = UserAccount>) -> Self {
        Self {
            accounts: Mutex::new(
                accounts
                    .into_iter()
                    .map(|account| (account.username.clone(), account))
                    .collect(),
            ),
        }
    }
}

fn poisoned<T>(_: T) -> UserAccountRepositoryError {
    UserAccountRepositoryError::query("in-memory account store poisoned")
}

#[async_trait]
impl UserAccountRepository for InMemoryUserAccountRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        let accounts = self.accounts.lock().map_err(poisoned)?;
        Ok(accounts.get(username).cloned())
    }

    async fn upsert(&self, account: &UserAccount) -> Result<(), UserAccountRepositoryError> {
        let mut accounts = self.accounts.lock().map_err(poisoned)?;
        accounts.insert(account.username.clone(), account.clone());
        Ok(())
    }
}
