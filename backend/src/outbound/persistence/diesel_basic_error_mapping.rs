//! Shared Diesel and pool error mapping for the repositories.
//!
//! Connection-level failures map to a port's `Connection` variant (served as
//! `503`); everything else maps to `Query` (served as `500`).

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure with the port's connection constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    debug!(error = %error, "connection pool failure");
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure with the port's query and connection constructors.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced row does not exist")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DiscountCodeRepositoryError;
    use rstest::rstest;

    fn map(error: DieselError) -> DiscountCodeRepositoryError {
        map_basic_diesel_error(
            error,
            DiscountCodeRepositoryError::query,
            DiscountCodeRepositoryError::connection,
        )
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert_eq!(
            map(DieselError::NotFound),
            DiscountCodeRepositoryError::query("record not found")
        );
    }

    #[rstest]
    fn broken_transactions_are_connection_errors() {
        assert_eq!(
            map(DieselError::BrokenTransactionManager),
            DiscountCodeRepositoryError::connection("database connection error")
        );
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_basic_pool_error(
            PoolError::checkout("timed out"),
            DiscountCodeRepositoryError::connection,
        );
        assert_eq!(mapped, DiscountCodeRepositoryError::connection("timed out"));
    }
}
