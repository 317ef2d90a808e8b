//! Enums for center kinds, material types, and attribution outcomes.
//!
//! Closed enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for the exact string stored in SQL. `MaterialType` is
//! open-ended: the relational store accepts any type string, so unknown values
//! are carried verbatim in `MaterialType::Other`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// CenterKind
// ---------------------------------------------------------------------------

/// Whether a location row is a tutoring center or a study hall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CenterKind {
    Center,
    Hall,
}

impl CenterKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Hall => "hall",
        }
    }
}

impl FromStr for CenterKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Self::Center),
            "hall" => Ok(Self::Hall),
            other => Err(CoreError::Validation(format!("unknown center kind '{other}'"))),
        }
    }
}

impl fmt::Display for CenterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MaterialType
// ---------------------------------------------------------------------------

/// Kind of lesson artifact stored for a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaterialType {
    StudentBlackboardImage,
    TeacherBlackboardImage,
    BlackboardImage,
    /// Any type string the store holds that the auditor has no rule for.
    Other(String),
}

impl MaterialType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::StudentBlackboardImage => "student_blackboard_image",
            Self::TeacherBlackboardImage => "teacher_blackboard_image",
            Self::BlackboardImage => "blackboard_image",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the type declares student authorship.
    #[must_use]
    pub const fn is_student_blackboard(&self) -> bool {
        matches!(self, Self::StudentBlackboardImage)
    }

    /// Whether the type declares teacher authorship.
    #[must_use]
    pub const fn is_teacher_blackboard(&self) -> bool {
        matches!(self, Self::TeacherBlackboardImage)
    }
}

impl From<&str> for MaterialType {
    fn from(value: &str) -> Self {
        match value {
            "student_blackboard_image" => Self::StudentBlackboardImage,
            "teacher_blackboard_image" => Self::TeacherBlackboardImage,
            "blackboard_image" => Self::BlackboardImage,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for MaterialType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<MaterialType> for String {
    fn from(value: MaterialType) -> Self {
        match value {
            MaterialType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OwnerKind
// ---------------------------------------------------------------------------

/// The kind of person a material was attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Student,
    Teacher,
    Unknown,
}

impl OwnerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Outcome of attributing one material.
///
/// ```text
/// title ~ declared student        → matched (student)
/// title ~ exactly one teacher     → matched (teacher-typed) | mismatched
/// title ~ several teachers        → ambiguous
/// title ~ nobody                  → unattributed
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Matched,
    Mismatched,
    Ambiguous,
    Unattributed,
}

impl Confidence {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Mismatched => "mismatched",
            Self::Ambiguous => "ambiguous",
            Self::Unattributed => "unattributed",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
