//! The listing seam every storage backend implements.

use std::future::Future;

use crate::error::StorageError;

/// One entry of a single directory listing, named relative to that directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub is_directory: bool,
}

impl ListEntry {
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }

    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }
}

/// A paged, non-recursive directory listing API.
///
/// `dir` is a `/`-joined path without leading or trailing slashes; the empty
/// string is the bucket root. A page shorter than `limit` ends the directory.
pub trait StorageLister: Send + Sync + 'static {
    /// List up to `limit` entries of `dir`, skipping the first `offset`.
    fn list_page(
        &self,
        dir: &str,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ListEntry>, StorageError>> + Send;

    /// Confirm the bucket exists and is readable.
    fn check_bucket(&self) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Backend bookkeeping entries that count toward page length but are
    /// not real objects.
    fn is_placeholder(&self, _entry: &ListEntry) -> bool {
        false
    }
}

/// Join a directory path and an entry name.
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Strip leading and trailing slashes so `"/teachers/"` and `"teachers"` agree.
#[must_use]
pub fn clean_dir(dir: &str) -> &str {
    dir.trim_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_at_root_and_below() {
        assert_eq!(join_path("", "teachers"), "teachers");
        assert_eq!(join_path("teachers", "세현"), "teachers/세현");
    }

    #[test]
    fn clean_dir_trims_slashes() {
        assert_eq!(clean_dir("/teachers/"), "teachers");
        assert_eq!(clean_dir("/"), "");
        assert_eq!(clean_dir("a/b"), "a/b");
    }
}
