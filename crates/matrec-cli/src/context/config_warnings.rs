use matrec_config::MatrecConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &MatrecConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &MatrecConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.turso.is_configured() && has_env_prefix(&env_keys, "MATREC_TURSO") {
        warnings.push(
            "Turso config appears default while MATREC_TURSO* env vars exist. Use double underscores (example: MATREC_TURSO__URL)."
                .to_string(),
        );
    }

    if !config.storage.is_configured() && has_env_prefix(&env_keys, "MATREC_STORAGE") {
        warnings.push(
            "Storage config appears default while MATREC_STORAGE* env vars exist. Use double underscores (example: MATREC_STORAGE__SERVICE_KEY)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
