//! Anime catalogue domain service.
//!
//! Implements the [`AnimeQuery`] and [`AnimeCommand`] driving ports on top of
//! an [`AnimeRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{AnimeCommand, AnimeQuery, AnimeRepository, AnimeRepositoryError};
use crate::domain::{Anime, AnimeId, Error};

/// Message returned when a looked-up record does not exist.
pub const ANIME_NOT_FOUND: &str = "Anime not found";
/// Message returned when a batch contains an empty name.
pub const INVALID_NAME: &str = "Invalid Name";

/// Catalogue service implementing the driving ports.
#[derive(Clone)]
pub struct AnimeService<R> {
    repository: Arc<R>,
}

impl<R> AnimeService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> AnimeService<R>
where
    R: AnimeRepository,
{
    fn map_repository_error(error: AnimeRepositoryError) -> Error {
        match &error {
            AnimeRepositoryError::Connection { message } => {
                Error::service_unavailable("anime store unavailable")
                    .with_developer_message(format!("anime repository unavailable: {message}"))
            }
            AnimeRepositoryError::Query { message } => Error::internal("Internal server error")
                .with_developer_message(format!("anime repository error: {message}")),
        }
        .with_source(error)
    }
}

#[async_trait]
impl<R> AnimeQuery for AnimeService<R>
where
    R: AnimeRepository,
{
    async fn find_all(&self) -> Result<Vec<Anime>, Error> {
        self.repository
            .find_all()
            .await
            .map_err(Self::map_repository_error)
    }

    async fn find_by_id(&self, id: AnimeId) -> Result<Anime, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| {
                Error::not_found(ANIME_NOT_FOUND)
                    .with_developer_message(format!("no anime stored with id {id}"))
            })
    }
}

#[async_trait]
impl<R> AnimeCommand for AnimeService<R>
where
    R: AnimeRepository,
{
    async fn save(&self, anime: Anime) -> Result<Anime, Error> {
        self.repository
            .save(anime)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn save_all(&self, animes: Vec<Anime>) -> Result<Vec<Anime>, Error> {
        let saved = self
            .repository
            .save_all(animes)
            .await
            .map_err(Self::map_repository_error)?;

        // Names are checked after the transaction committed; earlier rows stay.
        if let Some(position) = saved.iter().position(|anime| anime.validate().is_err()) {
            warn!(
                persisted = saved.len(),
                position, "batch contained an empty name after persisting"
            );
            return Err(Error::invalid_request(INVALID_NAME).with_developer_message(format!(
                "anime at position {position} has an empty name"
            )));
        }
        Ok(saved)
    }

    async fn update(&self, id: AnimeId, anime: Anime) -> Result<(), Error> {
        let existing = self.find_by_id(id).await?;
        let target = existing.id.unwrap_or(id);
        self.repository
            .save(anime.with_id(target))
            .await
            .map_err(Self::map_repository_error)?;
        Ok(())
    }

    async fn delete(&self, id: AnimeId) -> Result<(), Error> {
        let existing = self.find_by_id(id).await?;
        self.repository
            .delete(existing.id.unwrap_or(id))
            .await
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
#[path = "anime_service_tests.rs"]
mod tests;
