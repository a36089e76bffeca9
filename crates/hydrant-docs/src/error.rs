//! Error types for the description crate.

use hydrant_core::HydrantError;
use thiserror::Error;

/// Errors raised while producing hypermedia descriptions.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize a description document.
    #[error("Failed to serialize description: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The `format` argument names no known output format.
    #[error("Unknown description format '{format}'")]
    UnknownFormat {
        /// The rejected value.
        format: String,
    },

    /// The configured base IRI is not an absolute `http(s)` URI.
    #[error("Invalid base IRI '{iri}': {reason}")]
    InvalidBaseIri {
        /// The rejected IRI.
        iri: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The documentation path segment is unusable.
    #[error("Invalid documentation segment '{segment}'")]
    InvalidSegment {
        /// The rejected segment.
        segment: String,
    },
}

/// Result type for description operations.
pub type DocsResult<T> = Result<T, DocsError>;

impl From<DocsError> for HydrantError {
    fn from(error: DocsError) -> Self {
        match error {
            DocsError::UnknownFormat { .. } => Self::bad_argument("format", error.to_string()),
            DocsError::InvalidBaseIri { .. } | DocsError::InvalidSegment { .. } => {
                Self::configuration("Documentation", error.to_string())
            }
            DocsError::SerializationError(source) => {
                Self::internal_with_source("failed to serialize description", source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrant_core::ErrorCategory;

    #[test]
    fn test_serialization_error() {
        let err: DocsError = serde_json::from_str::<String>("invalid")
            .unwrap_err()
            .into();
        assert!(matches!(err, DocsError::SerializationError(_)));
        assert!(err.to_string().contains("serialize"));
    }

    #[test]
    fn test_unknown_format_is_bad_request() {
        let err: HydrantError = DocsError::UnknownFormat {
            format: "yaml".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::BadRequest);
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_invalid_base_iri_is_configuration() {
        let err: HydrantError = DocsError::InvalidBaseIri {
            iri: "shop".to_string(),
            reason: "not absolute".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
