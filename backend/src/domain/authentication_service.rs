//! Credential verification against stored accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{Authenticator, UserAccountRepository, UserAccountRepositoryError};
use crate::domain::{BasicCredentials, Error, Principal};

/// Message returned for any failed login.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`Authenticator`] backed by a [`UserAccountRepository`].
#[derive(Clone)]
pub struct AccountAuthenticator<R> {
    accounts: Arc<R>,
}

impl<R> AccountAuthenticator<R> {
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }
}

fn map_account_error(error: UserAccountRepositoryError) -> Error {
    match &error {
        UserAccountRepositoryError::Connection { message } => {
            Error::service_unavailable("credential store unavailable")
                .with_developer_message(format!("account repository unavailable: {message}"))
        }
        UserAccountRepositoryError::Query { message } => Error::internal("Internal server error")
            .with_developer_message(format!("account repository error: {message}")),
    }
    .with_source(error)
}

#[async_trait]
impl<R> Authenticator for AccountAuthenticator<R>
where
    R: UserAccountRepository,
{
    async fn authenticate(&self, credentials: &BasicCredentials) -> Result<Principal, Error> {
        let account = self
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(map_account_error)?;

        match account {
            Some(account) if account.password_hash.verify(credentials.password()) => {
                Ok(account.principal())
            }
            Some(_) => {
                debug!(username = credentials.username(), "password mismatch");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            None => {
                debug!(username = credentials.username(), "unknown user");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}
