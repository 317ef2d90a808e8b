//! Database error types for matrec-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A column held a value that could not be parsed.
    #[error("Invalid column value: {0}")]
    Query(String),

    /// Invalid state encountered (e.g., no database configured).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
