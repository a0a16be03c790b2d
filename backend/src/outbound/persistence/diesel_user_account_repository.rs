//! PostgreSQL-backed `UserAccountRepository` over the `devdojo_user` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserAccountRepository, UserAccountRepositoryError};
use crate::domain::{PasswordHash, Role, UserAccount};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserAccountRow, UserAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::devdojo_user;

/// Diesel-backed account lookup.
#[derive(Clone)]
pub struct DieselUserAccountRepository {
    pool: DbPool,
}

impl DieselUserAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserAccountRepositoryError {
    map_basic_pool_error(error, UserAccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserAccountRepositoryError {
    map_basic_diesel_error(
        error,
        UserAccountRepositoryError::query,
        UserAccountRepositoryError::connection,
    )
}

/// Decode a stored row; an unreadable hash is a query failure.
fn row_to_account(row: UserAccountRow) -> Result<UserAccount, UserAccountRepositoryError> {
    let password_hash: PasswordHash = row.password.parse().map_err(|err| {
        UserAccountRepositoryError::query(format!(
            "stored password for {} is unreadable: {err}",
            row.username
        ))
    })?;
    let roles = Role::parse_authorities(&row.authorities);
    Ok(UserAccount {
        username: row.username,
        password_hash,
        roles,
    })
}

#[async_trait]
impl UserAccountRepository for DieselUserAccountRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserAccountRow> = devdojo_user::table
            .filter(devdojo_user::username.eq(username))
            .select(UserAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn upsert(&self, account: &UserAccount) -> Result<(), UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let password = account.password_hash.to_string();
        let authorities = Role::join_authorities(&account.roles);
        let row = NewUserAccountRow {
            name: account.username.as_str(),
            username: account.username.as_str(),
            password: password.as_str(),
            authorities: authorities.as_str(),
        };

        diesel::insert_into(devdojo_user::table)
            .values(&row)
            .on_conflict(devdojo_user::username)
            .do_update()
            .set((
                devdojo_user::password.eq(excluded(devdojo_user::password)),
                devdojo_user::authorities.eq(excluded(devdojo_user::authorities)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
