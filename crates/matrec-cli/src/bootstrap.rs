use std::path::Path;

use anyhow::Context;
use matrec_config::MatrecConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, reading `.env` and `.matrec/config.toml` from
/// `--project` when given and from the current directory otherwise.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<MatrecConfig> {
    match &flags.project {
        Some(project) => {
            let root = Path::new(project);
            if !root.is_dir() {
                anyhow::bail!(
                    "invalid --project '{}': directory does not exist",
                    root.display()
                );
            }
            MatrecConfig::load_from_project(root)
                .with_context(|| format!("failed to load config from {}", root.display()))
        }
        None => MatrecConfig::load_with_dotenv().context("failed to load config"),
    }
}
