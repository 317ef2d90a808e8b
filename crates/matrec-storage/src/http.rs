//! Response status handling for the storage REST API.
//!
//! 429 becomes [`StorageError::RateLimited`] (with `Retry-After` parsing) and
//! a missing bucket becomes [`StorageError::BucketNotFound`]. Any other
//! non-success status is [`StorageError::Api`].

use crate::error::StorageError;

/// Check a storage API response for error statuses.
///
/// Returns the response unchanged on success.
pub async fn check_response(
    resp: reqwest::Response,
    bucket: &str,
) -> Result<reqwest::Response, StorageError> {
    let status = resp.status();
    if status == 429 {
        return Err(StorageError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    // The storage API reports unknown buckets as either 404 or a 400 whose
    // body carries the real status.
    if status == 404 || (status == 400 && is_not_found_body(&message)) {
        return Err(StorageError::BucketNotFound(bucket.to_string()));
    }
    Err(StorageError::Api {
        status: status.as_u16(),
        message,
    })
}

fn is_not_found_body(body: &str) -> bool {
    body.to_lowercase().contains("not found")
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
