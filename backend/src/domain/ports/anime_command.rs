//! Driving port for catalogue mutations.

use async_trait::async_trait;

use crate::domain::{Anime, AnimeId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimeCommand: Send + Sync {
    /// Store a new record and return it with its assigned identifier.
    async fn save(&self, anime: Anime) -> Result<Anime, Error>;

    /// Store a batch of records and then check their names.
    ///
    /// Records are persisted before the check runs, so a failing batch may
    /// still leave rows behind.
    async fn save_all(&self, animes: Vec<Anime>) -> Result<Vec<Anime>, Error>;

    /// Replace the record stored under `id`. Never creates a record.
    async fn update(&self, id: AnimeId, anime: Anime) -> Result<(), Error>;

    /// Remove the record stored under `id`.
    async fn delete(&self, id: AnimeId) -> Result<(), Error>;
}
