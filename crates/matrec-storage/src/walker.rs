//! Storage tree walker.
//!
//! Turns a paged, one-level-at-a-time listing API into a flat sequence of
//! [`StorageObject`]s. Pending directories live on an explicit stack, so
//! depth costs heap entries rather than call-stack frames, and sibling
//! subtrees are entered in depth-first order. Up to `max_concurrent`
//! directories are listed at once; each listing pages through one directory
//! until a short page comes back.
//!
//! Only the root listing is fatal. A failing subdirectory is dropped along
//! with anything it had already returned, and the walk yields one
//! [`WalkEvent::Skipped`] warning for it instead.

use std::collections::VecDeque;
use std::sync::Arc;

use matrec_core::entities::StorageObject;
use matrec_core::warnings::Warning;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::StorageError;
use crate::lister::{ListEntry, StorageLister, clean_dir, join_path};

/// One item produced by a [`Walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// A directory or leaf object.
    Object(StorageObject),
    /// A subdirectory whose listing failed; its subtree is missing.
    Skipped(Warning),
}

/// Everything a completed walk produced, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageListing {
    pub objects: Vec<StorageObject>,
    pub warnings: Vec<Warning>,
}

/// Walker configuration bound to one lister.
pub struct StorageWalker<L> {
    lister: Arc<L>,
    page_size: usize,
    max_concurrent: usize,
}

impl<L: StorageLister> StorageWalker<L> {
    /// Both limits are clamped to at least 1.
    #[must_use]
    pub fn new(lister: L, page_size: usize, max_concurrent: usize) -> Self {
        Self {
            lister: Arc::new(lister),
            page_size: page_size.max(1),
            max_concurrent: max_concurrent.max(1),
        }
    }

    #[must_use]
    pub fn lister(&self) -> &L {
        &self.lister
    }

    /// Start a walk under `root` (empty for the bucket root).
    ///
    /// The root directory is listed before this returns. Calling `walk` again
    /// starts over from scratch.
    ///
    /// # Errors
    ///
    /// Returns the lister's error if the root cannot be listed, or
    /// [`StorageError::Cancelled`].
    pub async fn walk(&self, root: &str, cancel: CancellationToken) -> Result<Walk<L>, StorageError> {
        let root = clean_dir(root).to_string();
        let entries = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(StorageError::Cancelled),
            listed = list_directory(self.lister.as_ref(), &root, self.page_size) => listed?,
        };

        let mut walk = Walk {
            lister: Arc::clone(&self.lister),
            page_size: self.page_size,
            max_concurrent: self.max_concurrent,
            cancel,
            frontier: Vec::new(),
            in_flight: JoinSet::new(),
            ready: VecDeque::new(),
            listed: 1,
        };
        walk.accept(&root, entries);
        Ok(walk)
    }

    /// Run a walk to completion and collect its output.
    ///
    /// # Errors
    ///
    /// Same as [`Self::walk`] and [`Walk::next`]. On cancellation nothing
    /// collected so far is returned.
    pub async fn collect(
        &self,
        root: &str,
        cancel: CancellationToken,
    ) -> Result<StorageListing, StorageError> {
        let mut walk = self.walk(root, cancel).await?;
        let mut listing = StorageListing::default();
        while let Some(event) = walk.next().await? {
            match event {
                WalkEvent::Object(object) => listing.objects.push(object),
                WalkEvent::Skipped(warning) => listing.warnings.push(warning),
            }
        }
        tracing::info!(
            root,
            directories = walk.listed,
            objects = listing.objects.len(),
            skipped = listing.warnings.len(),
            "storage walk complete"
        );
        Ok(listing)
    }
}

type ListingResult = (String, Result<Vec<ListEntry>, StorageError>);

/// An in-progress traversal. Pull events with [`Walk::next`].
pub struct Walk<L> {
    lister: Arc<L>,
    page_size: usize,
    max_concurrent: usize,
    cancel: CancellationToken,
    /// Directories waiting to be listed; the last one is listed next.
    frontier: Vec<String>,
    in_flight: JoinSet<ListingResult>,
    ready: VecDeque<WalkEvent>,
    listed: usize,
}

impl<L: StorageLister> Walk<L> {
    /// Next object or warning, or `None` once every directory is listed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Cancelled`] when the token fires (in-flight
    /// listings are aborted), or [`StorageError::Task`] if a listing task
    /// panicked.
    pub async fn next(&mut self) -> Result<Option<WalkEvent>, StorageError> {
        loop {
            if self.cancel.is_cancelled() {
                self.in_flight.abort_all();
                return Err(StorageError::Cancelled);
            }
            if let Some(event) = self.ready.pop_front() {
                return Ok(Some(event));
            }

            self.fill();
            if self.in_flight.is_empty() {
                return Ok(None);
            }

            let joined = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    self.in_flight.abort_all();
                    return Err(StorageError::Cancelled);
                }
                joined = self.in_flight.join_next() => joined,
            };
            let Some(joined) = joined else {
                continue;
            };
            let (dir, result) = joined.map_err(|e| StorageError::Task(e.to_string()))?;
            self.listed += 1;
            match result {
                Ok(entries) => self.accept(&dir, entries),
                Err(error) => {
                    tracing::warn!(dir = %dir, %error, "directory listing failed; skipping subtree");
                    self.ready
                        .push_back(WalkEvent::Skipped(Warning::skipped_subtree(dir, error.to_string())));
                }
            }
        }
    }

    /// Directories listed so far, including the root.
    #[must_use]
    pub const fn directories_listed(&self) -> usize {
        self.listed
    }

    /// Spawn listings from the top of the frontier up to the concurrency cap.
    fn fill(&mut self) {
        while self.in_flight.len() < self.max_concurrent {
            let Some(dir) = self.frontier.pop() else {
                break;
            };
            let lister = Arc::clone(&self.lister);
            let page_size = self.page_size;
            self.in_flight.spawn(async move {
                let result = list_directory(lister.as_ref(), &dir, page_size).await;
                (dir, result)
            });
        }
    }

    /// Queue a finished directory's entries and push its subdirectories.
    fn accept(&mut self, dir: &str, entries: Vec<ListEntry>) {
        let mut subdirs = Vec::new();
        for entry in entries {
            if self.lister.is_placeholder(&entry) {
                continue;
            }
            let path = join_path(dir, &entry.name);
            if entry.is_directory {
                self.ready
                    .push_back(WalkEvent::Object(StorageObject::directory(path.clone())));
                subdirs.push(path);
            } else {
                self.ready.push_back(WalkEvent::Object(StorageObject::leaf(path)));
            }
        }
        // Reversed so the first subdirectory ends up on top of the stack.
        self.frontier.extend(subdirs.into_iter().rev());
    }
}

/// List every page of one directory.
async fn list_directory<L: StorageLister>(
    lister: &L,
    dir: &str,
    page_size: usize,
) -> Result<Vec<ListEntry>, StorageError> {
    let mut entries = Vec::new();
    let mut offset = 0;
    loop {
        let page = lister.list_page(dir, offset, page_size).await?;
        let len = page.len();
        tracing::debug!(dir, offset, len, "listed page");
        entries.extend(page);
        if len < page_size {
            return Ok(entries);
        }
        offset += len;
    }
}
