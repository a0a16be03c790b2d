//! Driving port for credential verification.
//!
//! The authorization gate calls this port with decoded Basic credentials and
//! receives the caller's identity, without knowing where accounts live.

use async_trait::async_trait;

use crate::domain::{BasicCredentials, Error, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify `credentials` and return the matching identity.
    ///
    /// Unknown users and wrong passwords fail identically with
    /// `Unauthorized`.
    async fn authenticate(&self, credentials: &BasicCredentials) -> Result<Principal, Error>;
}
