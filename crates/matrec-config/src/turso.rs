//! Turso/libSQL configuration for the relational snapshot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TursoConfig {
    /// Database URL (e.g., `libsql://portal-acme.aws-ap-northeast-1.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Database auth token. Read-only tokens are sufficient.
    #[serde(default)]
    pub auth_token: String,

    /// Local SQLite file to audit instead of the remote database.
    /// Takes precedence over `url` when set.
    #[serde(default)]
    pub local_path: String,
}

impl TursoConfig {
    /// Check if the config has the minimum required fields for remote access.
    pub fn is_remote_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Check if a local database file is configured.
    pub fn has_local_path(&self) -> bool {
        !self.local_path.is_empty()
    }

    /// Check if any database source is available.
    pub fn is_configured(&self) -> bool {
        self.has_local_path() || self.is_remote_configured()
    }
}
