//! Telemetry error types.

use hydrant_core::HydrantError;
use thiserror::Error;

/// Errors that can occur during telemetry operations.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<TelemetryError> for HydrantError {
    fn from(err: TelemetryError) -> Self {
        HydrantError::configuration("Telemetry", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("failed".to_string());
        assert_eq!(err.to_string(), "Failed to initialize logging: failed");
    }

    #[test]
    fn test_invalid_config_display() {
        let err = TelemetryError::InvalidConfig("unknown format 'xml'".to_string());
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_into_hydrant_error() {
        let err: HydrantError = TelemetryError::LoggingInit("already set".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error in Telemetry: Failed to initialize logging: already set"
        );
    }
}
