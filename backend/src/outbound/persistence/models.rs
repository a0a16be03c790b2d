//! Internal Diesel row structs.
//!
//! These never leave the persistence layer.

use diesel::prelude::*;

use super::schema::{anime, devdojo_user};

/// Row read from the `anime` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = anime)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnimeRow {
    pub id: i32,
    pub name: String,
}

/// Insertable row; the id comes from the `SERIAL` sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = anime)]
pub(crate) struct NewAnimeRow<'a> {
    pub name: &'a str,
}

/// Changeset for overwriting an existing record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = anime)]
pub(crate) struct AnimeUpdate<'a> {
    pub name: &'a str,
}

/// Row read from the `devdojo_user` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = devdojo_user)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAccountRow {
    pub username: String,
    pub password: String,
    pub authorities: String,
}

/// Insertable account row. `name` mirrors the username for seeded accounts.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = devdojo_user)]
pub(crate) struct NewUserAccountRow<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub authorities: &'a str,
}
