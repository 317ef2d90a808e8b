//! # matrec-config
//!
//! Layered configuration loading for matrec using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MATREC_*` prefix, `__` as separator)
//! 2. Project-level `.matrec/config.toml`
//! 3. User-level `~/.config/matrec/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MATREC_TURSO__URL` -> `turso.url`,
//! `MATREC_STORAGE__SERVICE_KEY` -> `storage.service_key`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use matrec_config::MatrecConfig;
//!
//! let config = MatrecConfig::load_with_dotenv().expect("config");
//!
//! if config.turso.is_configured() {
//!     println!("Turso URL: {}", config.turso.url);
//! }
//! ```

mod error;
mod retry;
mod storage;
mod turso;

pub use error::ConfigError;
pub use retry::RetrySettings;
pub use storage::{StorageBackend, StorageConfig};
pub use turso::TursoConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatrecConfig {
    #[serde(default)]
    pub turso: TursoConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl MatrecConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if any) before building the figment.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration using `project_dir` instead of the current directory
    /// as the location of `.matrec/config.toml` and `.env`.
    pub fn load_from_project(project_dir: &Path) -> Result<Self, ConfigError> {
        let env_path = project_dir.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }
        Self::from_figment(Self::figment_for(project_dir))
    }

    /// Build the figment provider chain rooted at the current directory.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain with the project-local layer read
    /// from `project_dir/.matrec/config.toml`.
    pub fn figment_for(project_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_dir.join(".matrec").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("MATREC_").split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.storage.validate()?;
        Ok(config)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("matrec").join("config.toml"))
    }
}
