//! Errors from loading and validating `MatrecConfig`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed to read, or a value did not deserialize.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A value deserialized but would break a run (e.g. a zero page size).
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::ConfigError;

    #[test]
    fn invalid_value_names_the_field() {
        let error = ConfigError::InvalidValue {
            field: "storage.page_size".into(),
            reason: "must be at least 1".into(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for 'storage.page_size': must be at least 1"
        );
    }
}
