//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Catalogue records.
    anime (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Login accounts. `authorities` holds a comma-separated role list.
    devdojo_user (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
        #[max_length = 255]
        username -> Varchar,
        #[max_length = 255]
        password -> Varchar,
        #[max_length = 255]
        authorities -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(anime, devdojo_user);
