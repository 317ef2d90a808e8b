//! Cross-cutting error types for matrec.
//!
//! Domain-specific errors (`DatabaseError`, `StorageError`, `AuditError`) live
//! in their respective crates. They converge into `anyhow` in `matrec-cli`.

use thiserror::Error;

/// Errors raised while interpreting core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stored value is outside its allowed set (e.g. an unknown center kind).
    #[error("Validation error: {0}")]
    Validation(String),
}
