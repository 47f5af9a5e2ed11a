//! Database error types for regis-db.

use regis_core::errors::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A domain rule failed (not found, conflict, corrupt history, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// How a failure should be presented to the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// 404-equivalent.
    NotFound,
    /// 409-equivalent.
    Conflict,
    /// 400-equivalent.
    BadRequest,
    /// Reverting a terminal entry. Not retryable.
    InvalidTransition,
    /// Storage or programming failure.
    Internal,
}

impl DatabaseError {
    /// Classify this error for the calling layer.
    ///
    /// Corrupt stored state is not-found-class but keeps its own variant.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Core(core) => match core {
                CoreError::NotFound(_) | CoreError::CorruptState(_) => ErrorClass::NotFound,
                CoreError::Conflict(_) => ErrorClass::Conflict,
                CoreError::Precondition(_) => ErrorClass::BadRequest,
                CoreError::NotRevertible(_) => ErrorClass::InvalidTransition,
                CoreError::Encode(_) => ErrorClass::Internal,
            },
            Self::Query(_)
            | Self::Migration(_)
            | Self::NoResult
            | Self::InvalidState(_)
            | Self::LibSql(_)
            | Self::Other(_) => ErrorClass::Internal,
        }
    }

    /// The wrapped domain error, if any.
    #[must_use]
    pub const fn as_core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(core) => Some(core),
            _ => None,
        }
    }
}
