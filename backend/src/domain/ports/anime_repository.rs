//! Port for anime record persistence.
//!
//! Adapters store [`Anime`] rows and assign identifiers on insert. The
//! batch operation must be atomic: either every record is written or none.

use async_trait::async_trait;

use crate::domain::{Anime, AnimeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by anime repository adapters.
    pub enum AnimeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "anime repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "anime repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimeRepository: Send + Sync {
    /// Every stored record, ordered by identifier.
    async fn find_all(&self) -> Result<Vec<Anime>, AnimeRepositoryError>;

    /// Fetch a record by identifier.
    async fn find_by_id(&self, id: AnimeId) -> Result<Option<Anime>, AnimeRepositoryError>;

    /// Insert when `anime.id` is `None`, otherwise overwrite the stored row.
    async fn save(&self, anime: Anime) -> Result<Anime, AnimeRepositoryError>;

    /// Save every record in one transaction, returning them in input order.
    async fn save_all(&self, animes: Vec<Anime>) -> Result<Vec<Anime>, AnimeRepositoryError>;

    /// Remove the record with `id`. Removing an absent record is not an error.
    async fn delete(&self, id: AnimeId) -> Result<(), AnimeRepositoryError>;
}
