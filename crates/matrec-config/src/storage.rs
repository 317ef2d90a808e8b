//! Blob storage configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default shared root holding one directory per teacher.
fn default_teacher_root() -> String {
    String::from("teachers")
}

/// Default entries requested per listing page.
const fn default_page_size() -> usize {
    100
}

/// Default number of directory listings in flight.
const fn default_max_concurrent_listings() -> usize {
    4
}

/// Default S3 region. R2 ignores the value but the client requires one.
fn default_region() -> String {
    String::from("auto")
}

/// Which listing API the bucket is reached through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Supabase-style storage REST API (`/storage/v1/object/list/{bucket}`).
    #[default]
    Supabase,
    /// S3-compatible object store (AWS S3, Cloudflare R2, MinIO).
    S3,
    /// A directory on the local filesystem; buckets are subdirectories.
    Local,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// API base URL. For `supabase`, the project URL; for `s3`, a custom
    /// endpoint (built from `account_id` for R2 when empty).
    #[serde(default)]
    pub endpoint: String,

    /// Service-role key for the Supabase storage API.
    #[serde(default)]
    pub service_key: String,

    /// Cloudflare account ID (R2 endpoint derivation).
    #[serde(default)]
    pub account_id: String,

    /// S3 access key ID.
    #[serde(default)]
    pub access_key_id: String,

    /// S3 secret access key.
    #[serde(default)]
    pub secret_access_key: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Filesystem directory containing bucket directories (`local` backend).
    #[serde(default)]
    pub local_root: String,

    /// Bucket to audit. Usually given on the command line.
    #[serde(default)]
    pub bucket_name: String,

    /// Shared root path hosting one subdirectory per teacher.
    #[serde(default = "default_teacher_root")]
    pub teacher_root: String,

    /// Entries requested per listing call.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on directory listings in flight.
    #[serde(default = "default_max_concurrent_listings")]
    pub max_concurrent_listings: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            endpoint: String::new(),
            service_key: String::new(),
            account_id: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: default_region(),
            local_root: String::new(),
            bucket_name: String::new(),
            teacher_root: default_teacher_root(),
            page_size: default_page_size(),
            max_concurrent_listings: default_max_concurrent_listings(),
        }
    }
}

impl StorageConfig {
    /// Check if the selected backend has its required credentials.
    pub fn is_configured(&self) -> bool {
        match self.backend {
            StorageBackend::Supabase => !self.endpoint.is_empty() && !self.service_key.is_empty(),
            StorageBackend::S3 => {
                (!self.endpoint.is_empty() || !self.account_id.is_empty())
                    && !self.access_key_id.is_empty()
                    && !self.secret_access_key.is_empty()
            }
            StorageBackend::Local => !self.local_root.is_empty(),
        }
    }

    /// Build the S3 endpoint URL.
    ///
    /// Returns the custom `endpoint` if set, otherwise builds the R2 URL from `account_id`.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.is_empty() {
            format!("https://{}.r2.cloudflarestorage.com", self.account_id)
        } else {
            self.endpoint.trim_end_matches('/').to_string()
        }
    }

    /// Reject values that would stall or break the walker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.max_concurrent_listings == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.max_concurrent_listings".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
