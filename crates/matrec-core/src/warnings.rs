//! Recoverable problems recorded during a reconciliation run.
//!
//! A warning never aborts a run. It tells the operator that coverage was
//! incomplete: a storage subtree was skipped, or a relational lookup could not
//! be resolved and the affected record was treated as unknown.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a recoverable problem.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A storage directory listing failed; its subtree is missing from the run.
    SkippedSubtree,
    /// A record points at a related row that does not exist.
    MissingRelation,
    /// A column held a value that could not be parsed.
    InvalidField,
    /// An auxiliary query failed and its data was left empty.
    AuxiliaryQuery,
}

impl WarningKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SkippedSubtree => "skipped_subtree",
            Self::MissingRelation => "missing_relation",
            Self::InvalidField => "invalid_field",
            Self::AuxiliaryQuery => "auxiliary_query",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recoverable problem. `subject` names the path or record it concerns.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Warning {
    pub kind: WarningKind,
    pub subject: String,
    pub message: String,
}

impl Warning {
    #[must_use]
    pub fn new(kind: WarningKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn skipped_subtree(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(WarningKind::SkippedSubtree, path, message)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}
