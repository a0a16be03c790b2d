//! Port for stored credential lookups.

use async_trait::async_trait;

use crate::domain::UserAccount;

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum UserAccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query failed or returned an unreadable row.
        Query { message: String } => "account repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Fetch the account registered under `username`.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError>;

    /// Insert the account, replacing any existing one with the same username.
    async fn upsert(&self, account: &UserAccount) -> Result<(), UserAccountRepositoryError>;
}
