//! Name normalization and matching.
//!
//! Material titles and storage paths are free text that may embed a person's
//! name anywhere, with arbitrary spacing and casing. Both sides of every
//! comparison are canonicalized with [`normalize`] and then compared by plain
//! substring containment in either direction. There is deliberately no
//! edit-distance matching: every match in a report can be reproduced by a
//! human reading the two strings.

/// Canonical comparison form: lower-cased (Unicode-aware), all whitespace removed.
#[must_use]
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Whether `a` contains `b` or `b` contains `a` after normalization.
///
/// Returns `false` when either side normalizes to the empty string.
#[must_use]
pub fn matches(a: &str, b: &str) -> bool {
    matches_normalized(&normalize(a), &normalize(b))
}

/// [`matches`] for values that are already in [`normalize`]d form.
#[must_use]
pub fn matches_normalized(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// A name kept alongside its normalized form, for rosters that are matched
/// against many titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    raw: String,
    normalized: String,
}

impl NormalizedName {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: normalize(raw),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Match against an already-normalized haystack.
    #[must_use]
    pub fn matches(&self, normalized_other: &str) -> bool {
        matches_normalized(&self.normalized, normalized_other)
    }
}
