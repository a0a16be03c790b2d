//! HTTP inbound adapter exposing the REST catalogue.

pub mod animes;
pub mod auth;
pub mod basic_auth;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
