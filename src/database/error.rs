use error_stack::Report;
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The configured Postgres connection url could not be parsed.
    #[error("invalid connection url")]
    InvalidUrl,
    /// The pool has no reliable connection to the database.
    #[error("unhealthy database pool")]
    UnhealthyPool,
    /// A row violated a unique constraint.
    #[error("unique constraint violated")]
    UniqueViolation,
    /// A row could not be turned into its model.
    #[error("could not decode row")]
    Decode,
    #[error("could not run database migrations")]
    Migration,
    #[error("query failed")]
    Query,
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
    fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_db_error(self) -> Result<T> {
        self.map_err(|e| {
            let context = match &e {
                sqlx::Error::Database(err) if err.is_unique_violation() => Error::UniqueViolation,
                sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Io(..)
                | sqlx::Error::Tls(..) => Error::UnhealthyPool,
                sqlx::Error::ColumnDecode { .. }
                | sqlx::Error::ColumnNotFound(..)
                | sqlx::Error::Decode(..) => Error::Decode,
                _ => Error::Query,
            };
            Report::new(e).change_context(context)
        })
    }
}

/// This trait deals with `error_stack::Report<Error>` because it is
/// annoying to check which variant a report is currently holding:
///
/// ```rust,ignore
/// let result = users.create(new_user).await;
/// if let Err(e) = result {
///     let is_unhealthy = e.downcast_ref::<helpdesk::database::Error>()
///         .map(|v| matches!(v, helpdesk::database::Error::UnhealthyPool))
///         .unwrap_or_default();
///     ...
/// }
/// ```
pub trait ReportExt {
    fn is_unhealthy(&self) -> bool;
    fn is_unique_violation(&self) -> bool;
}

impl<C> ReportExt for Report<C> {
    fn is_unhealthy(&self) -> bool {
        self.downcast_ref::<Error>()
            .map(|v| matches!(v, Error::UnhealthyPool))
            .unwrap_or_default()
    }

    fn is_unique_violation(&self) -> bool {
        self.downcast_ref::<Error>()
            .map(|v| matches!(v, Error::UniqueViolation))
            .unwrap_or_default()
    }
}
