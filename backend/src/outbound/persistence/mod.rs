//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and map
//! database failures onto the port error enums. Row structs and the schema
//! stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use anime_backend::outbound::persistence::{DbPool, DieselAnimeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/animes")).await?;
//! let repo = DieselAnimeRepository::new(pool);
//! ```

mod diesel_anime_repository;
mod diesel_basic_error_mapping;
mod diesel_user_account_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_anime_repository::DieselAnimeRepository;
pub use diesel_user_account_repository::DieselUserAccountRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
