//! `BTreeMap`-backed `AnimeRepository` with sequential identifiers.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{AnimeRepository, AnimeRepositoryError};
use crate::domain::{Anime, AnimeId};

#[derive(Debug, Clone)]
struct Store {
    /// `None` once every positive `i32` has been handed out.
    next_id: Option<i32>,
    rows: BTreeMap<AnimeId, String>,
}

impl Store {
    fn starting_at(next_id: i32) -> Self {
        Self {
            next_id: Some(next_id),
            rows: BTreeMap::new(),
        }
    }

    fn allocate(&mut self) -> Result<AnimeId, AnimeRepositoryError> {
        let id = self
            .next_id
            .ok_or_else(|| AnimeRepositoryError::query("anime id sequence exhausted"))?;
        self.next_id = id.checked_add(1);
        Ok(AnimeId::new(id))
    }

    fn save(&mut self, record: Anime) -> Result<Anime, AnimeRepositoryError> {
        let id = match record.id {
            Some(id) if self.rows.contains_key(&id) => id,
            _ => self.allocate()?,
        };
        self.rows.insert(id, record.name.clone());
        Ok(record.with_id(id))
    }
}

/// Catalogue store held in process memory.
///
/// The lock is never held across an `.await`.
#[derive(Debug)]
pub struct InMemoryAnimeRepository {
    store: Mutex<Store>,
}

impl Default for InMemoryAnimeRepository {
    fn default() -> Self {
        Self {
            store: Mutex::new(Store::starting_at(1)),
        }
    }
}

impl InMemoryAnimeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, AnimeRepositoryError> {
        self.store
            .lock()
            .map_err(|_| AnimeRepositoryError::query("in-memory anime store poisoned"))
    }
}

#[async_trait]
impl AnimeRepository for InMemoryAnimeRepository {
    async fn find_all(&self) -> Result<Vec<Anime>, AnimeRepositoryError> {
        let store = self.lock()?;
        Ok(store
            .rows
            .iter()
            .map(|(id, name)| Anime::unsaved(name.clone()).with_id(*id))
            .collect())
    }

    async fn find_by_id(&self, id: AnimeId) -> Result<Option<Anime>, AnimeRepositoryError> {
        let store = self.lock()?;
        Ok(store
            .rows
            .get(&id)
            .map(|name| Anime::unsaved(name.clone()).with_id(id)))
    }

    async fn save(&self, record: Anime) -> Result<Anime, AnimeRepositoryError> {
        self.lock()?.save(record)
    }

    async fn save_all(&self, records: Vec<Anime>) -> Result<Vec<Anime>, AnimeRepositoryError> {
        let mut store = self.lock()?;
        // All or nothing, like the database transaction.
        let mut draft = store.clone();
        let saved = records
            .into_iter()
            .map(|record| draft.save(record))
            .collect::<Result<Vec<_>, _>>()?;
        *store = draft;
        Ok(saved)
    }

    async fn delete(&self, id: AnimeId) -> Result<(), AnimeRepositoryError> {
        self.lock()?.rows.remove(&id);
        Ok(())
    }
}
