//! Shared Diesel error classification for the repositories.
//!
//! Repositories translate a [`DbFailure`] into their own port error enum; the
//! classification of Diesel and pool errors happens once here.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Database failure reduced to what the ports can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    Connection(String),
    Query(String),
    /// Unique constraint violated; carries the constraint name when known.
    Unique(Option<String>),
    /// Foreign key violated; carries the constraint name when known.
    ForeignKey(Option<String>),
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
                let constraint = info.constraint_name().map(str::to_owned);
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::Unique(constraint),
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKey(constraint),
                    DatabaseErrorKind::ClosedConnection => {
                        Self::Connection("database connection error".to_owned())
                    }
                    _ => Self::Query("database error".to_owned()),
                }
            }
            other => {
                debug!(error = %other, "diesel operation failed");
                Self::Query("database query error".to_owned())
            }
        }
    }
}

/// Column named by a `<table>_<column>_key` or `<table>_<column>_fkey`
/// constraint.
///
/// # Examples
/// ```ignore
/// assert_eq!(constraint_column(Some("users_email_key"), "users"), Some("email"));
/// ```
pub(crate) fn constraint_column<'a>(constraint: Option<&'a str>, table: &str) -> Option<&'a str> {
    let rest = constraint?.strip_prefix(table)?.strip_prefix('_')?;
    rest.strip_suffix("_fkey")
        .or_else(|| rest.strip_suffix("_key"))
}
