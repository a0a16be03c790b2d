//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod anime_command;
mod anime_query;
mod anime_repository;
mod authenticator;
mod user_account_repository;

#[cfg(test)]
pub use anime_command::MockAnimeCommand;
pub use anime_command::AnimeCommand;
#[cfg(test)]
pub use anime_query::MockAnimeQuery;
pub use anime_query::AnimeQuery;
#[cfg(test)]
pub use anime_repository::MockAnimeRepository;
pub use anime_repository::{AnimeRepository, AnimeRepositoryError};
#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::Authenticator;
#[cfg(test)]
pub use user_account_repository::MockUserAccountRepository;
pub use user_account_repository::{UserAccountRepository, UserAccountRepositoryError};
