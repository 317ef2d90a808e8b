//! Scope of one run: bucket and teacher root, plus an optional name filter.

use matrec_core::entities::{Material, StorageObject};
use matrec_core::names::{NormalizedName, normalize};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters of one reconciliation run. Echoed into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditScope {
    /// Bucket that was walked.
    pub bucket: String,
    /// Directory under which every subdirectory is one teacher's folder.
    pub teacher_root: String,
    /// Where the walk started; empty for the bucket root.
    pub walk_root: String,
    /// Restricts the audit to records whose name matches.
    pub name_filter: Option<String>,
}

impl AuditScope {
    #[must_use]
    pub fn new(bucket: impl Into<String>, teacher_root: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            teacher_root: teacher_root.into().trim_matches('/').to_string(),
            walk_root: String::new(),
            name_filter: None,
        }
    }

    #[must_use]
    pub fn with_walk_root(mut self, root: impl Into<String>) -> Self {
        self.walk_root = root.into().trim_matches('/').to_string();
        self
    }

    /// Blank filters are treated as no filter.
    #[must_use]
    pub fn with_name_filter(mut self, filter: Option<String>) -> Self {
        self.name_filter = filter.filter(|f| !normalize(f).is_empty());
        self
    }

    #[must_use]
    pub fn filter(&self) -> NameFilter {
        NameFilter {
            name: self.name_filter.as_deref().map(NormalizedName::new),
        }
    }
}

/// Name filter applied to materials and storage paths.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    name: Option<NormalizedName>,
}

impl NameFilter {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.name.is_some()
    }

    /// Whether `text` passes the filter. Everything passes an inactive one.
    #[must_use]
    pub fn admits(&self, text: &str) -> bool {
        self.name
            .as_ref()
            .is_none_or(|name| name.matches(&normalize(text)))
    }

    /// A material is in scope when its title or its declared student's name
    /// matches.
    #[must_use]
    pub fn admits_material(&self, material: &Material, student_name: Option<&str>) -> bool {
        !self.is_active()
            || self.admits(&material.title)
            || student_name.is_some_and(|name| self.admits(name))
    }

    #[must_use]
    pub fn admits_object(&self, object: &StorageObject) -> bool {
        self.admits(&object.path)
    }
}
