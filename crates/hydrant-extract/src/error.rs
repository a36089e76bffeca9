//! Binding error types.
//!
//! This module provides error types for binding failures, including the
//! source the value was being read from.

use http::StatusCode;
use hydrant_core::{ArgumentSource, HydrantError};
use std::fmt;

/// Error that occurs while binding a request value to an argument.
///
/// # Example
///
/// ```rust
/// use hydrant_extract::BindingError;
/// use hydrant_core::ArgumentSource;
/// use http::StatusCode;
///
/// let err = BindingError::missing(ArgumentSource::Url, "id");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.binding_source(), ArgumentSource::Url);
/// assert!(err.to_string().contains("id"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingError {
    binding_source: ArgumentSource,
    kind: BindingErrorKind,
    field: String,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingErrorKind {
    /// Required value is missing
    Missing,
    /// Value has invalid type or format
    InvalidValue,
    /// Typed deserialization of a bound value failed
    DeserializationFailed,
}

impl BindingError {
    /// Creates an error for a missing value.
    #[must_use]
    pub fn missing(source: ArgumentSource, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            binding_source: source,
            kind: BindingErrorKind::Missing,
            message: format!("missing required {source} value: {field}"),
            field,
        }
    }

    /// Creates an error for a value that does not fit the declared shape.
    #[must_use]
    pub fn invalid_value(
        source: ArgumentSource,
        field: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let details = details.into();
        Self {
            binding_source: source,
            kind: BindingErrorKind::InvalidValue,
            message: format!("invalid {source} value '{field}': {details}"),
            field,
        }
    }

    /// Creates an error for a bound value that does not deserialize into the
    /// controller's type.
    #[must_use]
    pub fn deserialization_failed(field: impl Into<String>, details: impl Into<String>) -> Self {
        let field = field.into();
        let details = details.into();
        Self {
            binding_source: ArgumentSource::Neutral,
            kind: BindingErrorKind::DeserializationFailed,
            message: format!("argument '{field}' has the wrong shape: {details}"),
            field,
        }
    }

    /// Returns the source the value was read from.
    #[must_use]
    pub fn binding_source(&self) -> ArgumentSource {
        self.binding_source
    }

    /// Returns the argument name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns `true` for missing values.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.kind == BindingErrorKind::Missing
    }

    /// Binding faults are always the client's.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BindingError {}

impl From<BindingError> for HydrantError {
    fn from(error: BindingError) -> Self {
        HydrantError::bad_argument(error.field.clone(), error.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_error() {
        let err = BindingError::missing(ArgumentSource::QueryString, "take");

        assert_eq!(err.binding_source(), ArgumentSource::QueryString);
        assert_eq!(err.field(), "take");
        assert!(err.is_missing());
        assert!(err.to_string().contains("missing"));
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = BindingError::invalid_value(ArgumentSource::Url, "id", "'abc' is not an integer");

        assert!(!err.is_missing());
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn test_into_hydrant_error() {
        let err: HydrantError = BindingError::missing(ArgumentSource::Body, "product").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        match err {
            HydrantError::BadRequest { argument, .. } => {
                assert_eq!(argument.as_deref(), Some("product"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
