//! PostgreSQL-backed `AnimeRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{AnimeRepository, AnimeRepositoryError};
use crate::domain::{Anime, AnimeId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AnimeRow, AnimeUpdate, NewAnimeRow};
use super::pool::{DbPool, PoolError};
use super::schema::anime;

/// Diesel-backed catalogue store.
#[derive(Clone)]
pub struct DieselAnimeRepository {
    pool: DbPool,
}

impl DieselAnimeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AnimeRepositoryError {
    map_basic_pool_error(error, AnimeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AnimeRepositoryError {
    map_basic_diesel_error(
        error,
        AnimeRepositoryError::query,
        AnimeRepositoryError::connection,
    )
}

fn row_to_anime(row: AnimeRow) -> Anime {
    Anime::unsaved(row.name).with_id(AnimeId::new(row.id))
}

/// Insert or overwrite one record.
///
/// Saving under an identifier that no longer exists inserts a fresh row with
/// a newly assigned id, as the sequence owns identifier allocation.
async fn save_row(conn: &mut AsyncPgConnection, record: &Anime) -> QueryResult<AnimeRow> {
    if let Some(id) = record.id {
        let updated = diesel::update(anime::table.find(id.get()))
            .set(&AnimeUpdate {
                name: record.name.as_str(),
            })
            .returning(AnimeRow::as_returning())
            .get_result(conn)
            .await
            .optional()?;
        if let Some(row) = updated {
            return Ok(row);
        }
    }

    diesel::insert_into(anime::table)
        .values(&NewAnimeRow {
            name: record.name.as_str(),
        })
        .returning(AnimeRow::as_returning())
        .get_result(conn)
        .await
}

#[async_trait]
impl AnimeRepository for DieselAnimeRepository {
    async fn find_all(&self) -> Result<Vec<Anime>, AnimeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AnimeRow> = anime::table
            .select(AnimeRow::as_select())
            .order_by(anime::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_anime).collect())
    }

    async fn find_by_id(&self, id: AnimeId) -> Result<Option<Anime>, AnimeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AnimeRow> = anime::table
            .find(id.get())
            .select(AnimeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_anime))
    }

    async fn save(&self, record: Anime) -> Result<Anime, AnimeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        save_row(&mut conn, &record)
            .await
            .map(row_to_anime)
            .map_err(map_diesel_error)
    }

    async fn save_all(&self, records: Vec<Anime>) -> Result<Vec<Anime>, AnimeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let mut rows = Vec::with_capacity(records.len());
                    for record in &records {
                        rows.push(save_row(conn, record).await?);
                    }
                    Ok(rows)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_anime).collect())
    }

    async fn delete(&self, id: AnimeId) -> Result<(), AnimeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(anime::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
