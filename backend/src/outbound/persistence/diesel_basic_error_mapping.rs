//! Shared Diesel error mapping for the repositories in this module.
//!
//! Each repository passes its own `connection`/`query` constructors so the
//! port error type stays local to the adapter.

use tracing::debug;

use super::pool::PoolError;

/// Map pool failures onto a repository connection error.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel failures onto repository query or connection errors.
///
/// Closed connections and unable-to-send failures count as connectivity
/// problems; everything else is a query failure.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
            info,
        ) => connection(format!("database connection error: {}", info.message())),
        DieselError::BrokenTransactionManager => {
            connection("database transaction manager broken".to_owned())
        }
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::DatabaseError(_, info) => {
            query(format!("database error: {}", info.message()))
        }
        other => query(format!("database error: {other}")),
    }
}
