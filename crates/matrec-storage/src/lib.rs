//! # matrec-storage
//!
//! Blob storage access for matrec reconciliation runs.
//!
//! - [`StorageLister`] is the one-directory-per-call listing seam.
//! - [`HttpStorageLister`] talks to a Supabase-style storage REST API.
//! - [`ObjectStoreLister`] wraps any `object_store` backend (S3, R2, MinIO,
//!   local directories, in-memory stores in tests).
//! - [`StorageWalker`] flattens a bucket into [`StorageObject`]s with bounded
//!   concurrency and per-subtree failure isolation.
//!
//! [`StorageObject`]: matrec_core::entities::StorageObject

mod error;
mod http;
pub mod lister;
pub mod object;
pub mod supabase;
pub mod walker;

pub use error::StorageError;
pub use lister::{ListEntry, StorageLister};
pub use object::ObjectStoreLister;
pub use supabase::HttpStorageLister;
pub use walker::{StorageListing, StorageWalker, Walk, WalkEvent};

use matrec_config::{StorageBackend, StorageConfig};
use matrec_core::retry::RetryPolicy;

/// The lister a configuration selects, dispatched at runtime.
pub enum Lister {
    Http(HttpStorageLister),
    ObjectStore(ObjectStoreLister),
}

impl Lister {
    /// Build the backend named by `config.backend` for `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotConfigured`] when the backend's credentials
    /// are missing, or the backend's construction error.
    pub fn from_config(
        config: &StorageConfig,
        bucket: &str,
        retry: RetryPolicy,
    ) -> Result<Self, StorageError> {
        if !config.is_configured() {
            return Err(StorageError::NotConfigured(format!(
                "storage backend '{}' is missing credentials",
                backend_name(config.backend)
            )));
        }
        match config.backend {
            StorageBackend::Supabase => Ok(Self::Http(HttpStorageLister::new(
                &config.endpoint,
                &config.service_key,
                bucket,
                retry,
            )?)),
            StorageBackend::S3 | StorageBackend::Local => Ok(Self::ObjectStore(
                ObjectStoreLister::from_config(config, bucket)?,
            )),
        }
    }
}

const fn backend_name(backend: StorageBackend) -> &'static str {
    match backend {
        StorageBackend::Supabase => "supabase",
        StorageBackend::S3 => "s3",
        StorageBackend::Local => "local",
    }
}

impl StorageLister for Lister {
    async fn list_page(
        &self,
        dir: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ListEntry>, StorageError> {
        match self {
            Self::Http(lister) => lister.list_page(dir, offset, limit).await,
            Self::ObjectStore(lister) => lister.list_page(dir, offset, limit).await,
        }
    }

    async fn check_bucket(&self) -> Result<(), StorageError> {
        match self {
            Self::Http(lister) => lister.check_bucket().await,
            Self::ObjectStore(lister) => lister.check_bucket().await,
        }
    }

    fn is_placeholder(&self, entry: &ListEntry) -> bool {
        match self {
            Self::Http(lister) => lister.is_placeholder(entry),
            Self::ObjectStore(lister) => lister.is_placeholder(entry),
        }
    }
}
