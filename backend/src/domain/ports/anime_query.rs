//! Driving port for catalogue reads.
//!
//! Inbound adapters use this port to list and fetch records without
//! importing persistence concerns.

use async_trait::async_trait;

use crate::domain::{Anime, AnimeId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimeQuery: Send + Sync {
    /// Every record in the catalogue.
    async fn find_all(&self) -> Result<Vec<Anime>, Error>;

    /// Fetch one record, failing with `NotFound` when it does not exist.
    async fn find_by_id(&self, id: AnimeId) -> Result<Anime, Error>;
}
