//! Classification of pool and Diesel failures shared by the adapters.
//!
//! Each adapter maps a [`DbFailure`] onto its own port error; the detail
//! strings are logged at debug level and never reach HTTP clients.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse outcome of a failed database call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// Pool checkout failed or the server closed the connection.
    Connection(String),
    /// A unique index rejected the write. Carries the constraint name when
    /// the server reported one.
    UniqueViolation(Option<String>),
    /// Anything else: syntax, constraint, decoding.
    Query(String),
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        Self::Connection(error.into_message())
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
                match kind {
                    DatabaseErrorKind::UniqueViolation => {
                        Self::UniqueViolation(info.constraint_name().map(str::to_owned))
                    }
                    DatabaseErrorKind::ClosedConnection => {
                        Self::Connection("database connection closed".to_owned())
                    }
                    _ => Self::Query("database error".to_owned()),
                }
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            other => {
                debug!(error = %other, "diesel operation failed");
                Self::Query("database error".to_owned())
            }
        }
    }
}
