//! Shared Diesel error mapping for repositories with basic query semantics.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.message().to_owned())
}

/// Map Diesel failures onto `query`/`connection` constructors.
///
/// Closed connections become connection errors; everything else is a query
/// error. Database messages are logged at debug level, never returned.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: &DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => query("database query error"),
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    fn db_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("boom".to_owned()))
    }

    #[rstest]
    fn closed_connection_is_a_connection_error() {
        let mapped = map_basic_diesel_error(
            &db_error(DatabaseErrorKind::ClosedConnection),
            Mapped::Query,
            Mapped::Connection,
        );
        assert_eq!(mapped, Mapped::Connection("database connection error"));
    }

    #[rstest]
    #[case(db_error(DatabaseErrorKind::UniqueViolation))]
    #[case(DieselError::NotFound)]
    fn other_failures_are_query_errors(#[case] error: DieselError) {
        let mapped = map_basic_diesel_error(&error, Mapped::Query, Mapped::Connection);
        assert_eq!(mapped, Mapped::Query("database error"));
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), |message| message);
        assert_eq!(mapped, "timed out");
    }
}
