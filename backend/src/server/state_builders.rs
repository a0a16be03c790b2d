//! Builders wiring repositories into the driving ports used by the HTTP
//! layer.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{
    AnimeCommand, AnimeQuery, AnimeRepository, Authenticator, UserAccountRepository,
    UserAccountRepositoryError,
};
use crate::domain::{
    AccountAuthenticator, AnimeService, PasswordHash, PasswordHashError, Role, UserAccount,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryAnimeRepository, InMemoryUserAccountRepository};
use crate::outbound::persistence::{DbPool, DieselAnimeRepository, DieselUserAccountRepository};

use super::ServerConfig;

/// Username of the seeded account holding `ROLE_USER`.
pub const DEMO_USER: &str = "user";
/// Username of the seeded account holding `ROLE_USER` and `ROLE_ADMIN`.
pub const DEMO_ADMIN: &str = "admin";

/// Driving ports shared by every worker.
#[derive(Clone)]
pub struct AppPorts {
    pub animes: Arc<dyn AnimeQuery>,
    pub anime_commands: Arc<dyn AnimeCommand>,
    pub accounts: Arc<dyn UserAccountRepository>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppPorts {
    /// Wire services over a pair of repositories.
    pub fn from_repositories<A, U>(animes: Arc<A>, accounts: Arc<U>) -> Self
    where
        A: AnimeRepository + 'static,
        U: UserAccountRepository + 'static,
    {
        let service = Arc::new(AnimeService::new(animes));
        let authenticator = Arc::new(AccountAuthenticator::new(Arc::clone(&accounts)));
        Self {
            animes: service.clone() as Arc<dyn AnimeQuery>,
            anime_commands: service as Arc<dyn AnimeCommand>,
            accounts: accounts as Arc<dyn UserAccountRepository>,
            authenticator: authenticator as Arc<dyn Authenticator>,
        }
    }

    /// Ports over process-local stores.
    pub fn in_memory() -> Self {
        Self::from_repositories(
            Arc::new(InMemoryAnimeRepository::new()),
            Arc::new(InMemoryUserAccountRepository::new()),
        )
    }

    /// Ports over PostgreSQL.
    pub fn with_pool(pool: DbPool) -> Self {
        Self::from_repositories(
            Arc::new(DieselAnimeRepository::new(pool.clone())),
            Arc::new(DieselUserAccountRepository::new(pool)),
        )
    }

    /// State handed to the catalogue handlers.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(Arc::clone(&self.animes), Arc::clone(&self.anime_commands))
    }
}

/// Choose PostgreSQL when the configuration carries a pool, otherwise the
/// in-memory stores.
pub fn build_ports(config: &ServerConfig) -> AppPorts {
    match config.db_pool() {
        Some(pool) => AppPorts::with_pool(pool.clone()),
        None => {
            info!("no database configured; using in-memory stores");
            AppPorts::in_memory()
        }
    }
}

/// Failure while seeding the demo accounts.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to hash demo password: {0}")]
    Hash(#[from] PasswordHashError),
    #[error("failed to store demo account: {0}")]
    Store(#[from] UserAccountRepositoryError),
}

/// The demo accounts, all sharing `password` hashed at `cost`.
pub fn demo_accounts(password: &str, cost: u32) -> Result<[UserAccount; 2], PasswordHashError> {
    Ok([
        UserAccount {
            username: DEMO_USER.to_owned(),
            password_hash: PasswordHash::generate_with_cost(password, cost)?,
            roles: [Role::User].into_iter().collect(),
        },
        UserAccount {
            username: DEMO_ADMIN.to_owned(),
            password_hash: PasswordHash::generate_with_cost(password, cost)?,
            roles: [Role::User, Role::Admin].into_iter().collect(),
        },
    ])
}

/// Create or refresh the demo accounts.
///
/// # Errors
/// Fails when hashing fails, or with the first repository failure.
pub async fn seed_demo_accounts(
    accounts: &dyn UserAccountRepository,
    password: &str,
    cost: u32,
) -> Result<(), SeedError> {
    for account in demo_accounts(password, cost)? {
        accounts.upsert(&account).await?;
        info!(username = %account.username, "seeded demo account");
    }
    Ok(())
}
