//! Supabase-style storage REST API lister.
//!
//! `POST {endpoint}/storage/v1/object/list/{bucket}` returns one directory
//! level per call. Folders come back as entries without an `id`. Transient
//! failures (429, 5xx, timeouts) are retried with the shared backoff policy.

use std::time::Duration;

use matrec_core::retry::{RetryPolicy, retry_transient};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::http::check_response;
use crate::lister::{ListEntry, StorageLister};

/// File the storage dashboard drops into folders created empty.
const PLACEHOLDER_NAME: &str = ".emptyFolderPlaceholder";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: usize,
    offset: usize,
    sort_by: SortBy,
}

#[derive(Debug, Serialize)]
struct SortBy {
    column: &'static str,
    order: &'static str,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    name: String,
    #[serde(default)]
    id: Option<String>,
}

/// Lists a bucket through the storage REST API.
pub struct HttpStorageLister {
    http: reqwest::Client,
    endpoint: String,
    service_key: String,
    bucket: String,
    retry: RetryPolicy,
}

impl HttpStorageLister {
    /// Create a lister for `bucket` on the project at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Http`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        service_key: &str,
        bucket: &str,
        retry: RetryPolicy,
    ) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .user_agent("matrec/0.1")
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
            retry,
        })
    }

    fn list_url(&self) -> String {
        format!(
            "{}/storage/v1/object/list/{}",
            self.endpoint,
            urlencoding::encode(&self.bucket)
        )
    }

    fn bucket_url(&self) -> String {
        format!(
            "{}/storage/v1/bucket/{}",
            self.endpoint,
            urlencoding::encode(&self.bucket)
        )
    }

    async fn list_once(
        &self,
        dir: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ListEntry>, StorageError> {
        let body = ListRequest {
            prefix: dir,
            limit,
            offset,
            sort_by: SortBy {
                column: "name",
                order: "asc",
            },
        };
        let resp = self
            .http
            .post(self.list_url())
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp, &self.bucket).await?;
        let text = resp.text().await?;
        parse_listing(&text)
    }

    async fn check_bucket_once(&self) -> Result<(), StorageError> {
        let resp = self
            .http
            .get(self.bucket_url())
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await?;
        check_response(resp, &self.bucket).await?;
        Ok(())
    }
}

fn parse_listing(body: &str) -> Result<Vec<ListEntry>, StorageError> {
    let entries: Vec<ObjectEntry> =
        serde_json::from_str(body).map_err(|e| StorageError::Parse(e.to_string()))?;
    Ok(entries
        .into_iter()
        .map(|entry| ListEntry {
            is_directory: entry.id.is_none(),
            name: entry.name,
        })
        .collect())
}

impl StorageLister for HttpStorageLister {
    async fn list_page(
        &self,
        dir: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ListEntry>, StorageError> {
        retry_transient(&self.retry, StorageError::is_transient, || {
            self.list_once(dir, offset, limit)
        })
        .await
    }

    async fn check_bucket(&self) -> Result<(), StorageError> {
        retry_transient(&self.retry, StorageError::is_transient, || self.check_bucket_once()).await
    }

    fn is_placeholder(&self, entry: &ListEntry) -> bool {
        !entry.is_directory && entry.name == PLACEHOLDER_NAME
    }
}
