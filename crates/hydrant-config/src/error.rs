//! Configuration error types.

use std::path::PathBuf;

use hydrant_core::HydrantError;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field with the invalid value.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },

    /// Environment variable parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },

    /// Validation error after loading.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new environment variable parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

impl From<ConfigError> for HydrantError {
    fn from(error: ConfigError) -> Self {
        Self::configuration("HydrantConfig", error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = ConfigError::file_not_found("/etc/hydrant/hydrant.toml");
        assert!(err.to_string().contains("/etc/hydrant/hydrant.toml"));
    }

    #[test]
    fn test_into_hydrant_error() {
        let err: HydrantError = ConfigError::invalid_value("api.base_uri", "not absolute").into();
        assert_eq!(err.category(), hydrant_core::ErrorCategory::Configuration);
        assert!(err.to_string().contains("api.base_uri"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("cors.max_age_secs", "expected integer");
        assert!(err.to_string().contains("cors.max_age_secs"));
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn test_env_parse_error() {
        let err = ConfigError::env_parse_error("HYDRANT__CORS__MAX_AGE_SECS", "expected integer");
        assert!(err.to_string().contains("HYDRANT__CORS__MAX_AGE_SECS"));
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn test_validation_error() {
        let err = ConfigError::validation_error("documentation segment must not be empty");
        assert!(err.to_string().contains("documentation segment must not be empty"));
    }
}
