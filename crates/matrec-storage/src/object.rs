//! `object_store` lister for S3-compatible buckets and local directories.
//!
//! Object stores have no native offset paging for delimiter listings, so a
//! directory is listed once and served page by page from a per-directory
//! cache. A request at offset 0 always re-lists, so a walk that restarts
//! after an abandoned one never sees the old listing. The entry is dropped
//! after its last page.

use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::{Arc, Mutex};

use matrec_config::{StorageBackend, StorageConfig};
use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path;

use crate::error::StorageError;
use crate::lister::{ListEntry, StorageLister};

type DirCache = Mutex<HashMap<String, Arc<Vec<ListEntry>>>>;

/// Lists a bucket through any [`ObjectStore`].
pub struct ObjectStoreLister {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    cache: DirCache,
}

impl ObjectStoreLister {
    /// Wrap an existing store. `bucket` is used only in error messages.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, bucket: &str) -> Self {
        Self {
            store,
            bucket: bucket.to_string(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Build the store the `s3` or `local` backend configuration names.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::BucketNotFound`] when a local bucket directory
    /// is missing, [`StorageError::NotConfigured`] for the `supabase` backend,
    /// or the builder's error.
    pub fn from_config(config: &StorageConfig, bucket: &str) -> Result<Self, StorageError> {
        let store: Arc<dyn ObjectStore> = match config.backend {
            StorageBackend::S3 => Arc::new(
                AmazonS3Builder::new()
                    .with_endpoint(config.endpoint_url())
                    .with_region(&config.region)
                    .with_bucket_name(bucket)
                    .with_access_key_id(&config.access_key_id)
                    .with_secret_access_key(&config.secret_access_key)
                    .build()?,
            ),
            StorageBackend::Local => {
                let dir = FsPath::new(&config.local_root).join(bucket);
                if !dir.is_dir() {
                    return Err(StorageError::BucketNotFound(bucket.to_string()));
                }
                Arc::new(LocalFileSystem::new_with_prefix(dir)?)
            }
            StorageBackend::Supabase => {
                return Err(StorageError::NotConfigured(
                    "the supabase backend lists over HTTP, not object_store".into(),
                ));
            }
        };
        Ok(Self::new(store, bucket))
    }

    async fn list_dir(&self, dir: &str) -> Result<Vec<ListEntry>, StorageError> {
        // `Path::from` would percent-encode non-ASCII names; `parse` keeps them.
        let prefix = if dir.is_empty() {
            None
        } else {
            Some(Path::parse(dir).map_err(object_store::Error::from)?)
        };
        let result = self.store.list_with_delimiter(prefix.as_ref()).await?;

        let dirs = result
            .common_prefixes
            .iter()
            .filter_map(|p| p.filename().map(ListEntry::dir));
        let files = result
            .objects
            .iter()
            .filter_map(|meta| meta.location.filename().map(ListEntry::file));
        let mut entries: Vec<ListEntry> = dirs.chain(files).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn cached(&self, dir: &str) -> Option<Arc<Vec<ListEntry>>> {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(dir).cloned())
    }

    fn store_cached(&self, dir: &str, entries: Arc<Vec<ListEntry>>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(dir.to_string(), entries);
        }
    }

    /// Drop the entry for `dir` unless another walk has already replaced it.
    fn evict(&self, dir: &str, served: &Arc<Vec<ListEntry>>) {
        if let Ok(mut cache) = self.cache.lock() {
            if cache.get(dir).is_some_and(|current| Arc::ptr_eq(current, served)) {
                cache.remove(dir);
            }
        }
    }
}

impl StorageLister for ObjectStoreLister {
    async fn list_page(
        &self,
        dir: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ListEntry>, StorageError> {
        let cached = if offset == 0 { None } else { self.cached(dir) };
        let entries = match cached {
            Some(entries) => entries,
            None => {
                let entries = Arc::new(self.list_dir(dir).await?);
                self.store_cached(dir, Arc::clone(&entries));
                entries
            }
        };

        let start = offset.min(entries.len());
        let end = offset.saturating_add(limit).min(entries.len());
        let page = entries[start..end].to_vec();
        if page.len() < limit {
            self.evict(dir, &entries);
        }
        Ok(page)
    }

    async fn check_bucket(&self) -> Result<(), StorageError> {
        match self.store.list_with_delimiter(None).await {
            Ok(_) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => {
                Err(StorageError::BucketNotFound(self.bucket.clone()))
            }
            Err(e) if e.to_string().contains("NoSuchBucket") => {
                Err(StorageError::BucketNotFound(self.bucket.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
