//! Storage error types.

use thiserror::Error;

/// Errors that can occur while listing a bucket.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the storage API.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The storage API returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds the server asked us to wait.
        retry_after_secs: u64,
    },

    /// The target bucket does not exist or is not visible with these credentials.
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// Error from an `object_store` backend.
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// Failed to parse a listing response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The backend cannot be built from the given configuration.
    #[error("storage not configured: {0}")]
    NotConfigured(String),

    /// A listing task died before reporting a result.
    #[error("listing task failed: {0}")]
    Task(String),

    /// The walk was cancelled.
    #[error("storage walk cancelled")]
    Cancelled,
}

impl StorageError {
    /// Whether the failure is likely to clear on its own (rate limiting,
    /// 5xx responses, timeouts, dropped connections).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
