use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One entry of the blob namespace, addressed by its full `/`-joined path.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageObject {
    pub path: String,
    pub is_directory: bool,
}

impl StorageObject {
    #[must_use]
    pub fn leaf(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }

    #[must_use]
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
        }
    }

    /// Path segments, skipping empty ones produced by stray slashes.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|segment| !segment.is_empty())
    }

    /// Last path segment (the file or directory name).
    #[must_use]
    pub fn name(&self) -> &str {
        self.segments().last().unwrap_or_default()
    }

    /// File name without its final extension. Dotfiles keep their name.
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }
}
