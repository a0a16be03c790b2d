//! In-process adapters used when no database is configured and in tests.

mod anime_repository;
mod user_account_repository;

pub use anime_repository::InMemoryAnimeRepository;
pub use user_account_repository::InMemoryUserAccountRepository;
