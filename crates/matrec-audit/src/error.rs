//! Fatal errors of a reconciliation run.

use matrec_db::error::DatabaseError;
use matrec_storage::StorageError;
use thiserror::Error;

/// A failure that aborts the run. Recoverable problems are report warnings.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The relational snapshot could not be loaded.
    #[error("relational snapshot failed: {0}")]
    Snapshot(#[from] DatabaseError),

    /// The bucket is missing or its root could not be listed.
    #[error("storage access failed: {0}")]
    Storage(StorageError),

    /// The run was cancelled before a complete report existed.
    #[error("reconciliation cancelled")]
    Cancelled,
}

impl From<StorageError> for AuditError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Cancelled => Self::Cancelled,
            other => Self::Storage(other),
        }
    }
}
