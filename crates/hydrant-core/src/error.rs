//! Error types for Hydrant.
//!
//! This module provides the [`HydrantError`] type, the standard error type
//! used throughout the framework. Every fault raised while building the
//! descriptor table or while dispatching a request ends up here.
//!
//! | `ErrorCategory` | Status |
//! |---|---|
//! | `Configuration` | 500 (fatal at startup) |
//! | `NotFound` | 404 |
//! | `MethodNotAllowed` | 405 |
//! | `BadRequest` | 400 |
//! | `UnsupportedMediaType` | 415 |
//! | `NotAcceptable` | 406 |
//! | `Internal` | 500 |

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`HydrantError`].
pub type HydrantResult<T> = Result<T, HydrantError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid controller registration. Raised while building, never per request.
    Configuration,
    /// No operation or resource matches.
    NotFound,
    /// The path matches but the verb does not.
    MethodNotAllowed,
    /// Argument binding or conversion failed.
    BadRequest,
    /// No converter can read the request body.
    UnsupportedMediaType,
    /// No converter can write the response body.
    NotAcceptable,
    /// Internal server errors.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Configuration | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
        }
    }
}

/// Standard error type for Hydrant.
///
/// # Example
///
/// ```
/// use hydrant_core::{ErrorCategory, HydrantError};
///
/// fn find(id: i64) -> Result<String, HydrantError> {
///     Err(HydrantError::not_found_resource("Product", id.to_string()))
/// }
///
/// let error = find(7).unwrap_err();
/// assert_eq!(error.category(), ErrorCategory::NotFound);
/// ```
#[derive(Error, Debug)]
pub enum HydrantError {
    /// A controller registration is invalid.
    #[error("Configuration error in {controller}: {message}")]
    Configuration {
        /// Name of the offending controller.
        controller: String,
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The type of resource that was not found.
        resource_type: Option<String>,
        /// The identifier of the resource.
        resource_id: Option<String>,
    },

    /// The verb is not supported by any operation on this path.
    #[error("Method not allowed: {message}")]
    MethodNotAllowed {
        /// Human-readable error message.
        message: String,
        /// Verbs accepted on the matched path.
        allowed: Vec<Method>,
    },

    /// The request could not be bound to the operation arguments.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
        /// Name of the argument that failed, if known.
        argument: Option<String>,
    },

    /// No converter accepts the request body.
    #[error("Unsupported media type: {message}")]
    UnsupportedMediaType {
        /// Human-readable error message.
        message: String,
    },

    /// No converter can produce an acceptable response body.
    #[error("Not acceptable: {message}")]
    NotAcceptable {
        /// Human-readable error message.
        message: String,
    },

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl HydrantError {
    /// Creates a configuration error for a controller.
    #[must_use]
    pub fn configuration(controller: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            controller: controller.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
            resource_id: None,
        }
    }

    /// Creates a not found error with resource context.
    #[must_use]
    pub fn not_found_resource(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        let resource_type = resource_type.into();
        let resource_id = resource_id.into();
        Self::NotFound {
            message: format!("{resource_type} with ID '{resource_id}' not found"),
            resource_type: Some(resource_type),
            resource_id: Some(resource_id),
        }
    }

    /// Creates a method not allowed error carrying the accepted verbs.
    #[must_use]
    pub fn method_not_allowed(method: &Method, allowed: Vec<Method>) -> Self {
        Self::MethodNotAllowed {
            message: format!("{method} is not supported on this resource"),
            allowed,
        }
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            argument: None,
        }
    }

    /// Creates a bad request error for a specific argument.
    #[must_use]
    pub fn bad_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            argument: Some(argument.into()),
        }
    }

    /// Creates an unsupported media type error.
    #[must_use]
    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            message: message.into(),
        }
    }

    /// Creates a not acceptable error.
    #[must_use]
    pub fn not_acceptable(message: impl Into<String>) -> Self {
        Self::NotAcceptable {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::BadRequest { .. } => ErrorCategory::BadRequest,
            Self::UnsupportedMediaType { .. } => ErrorCategory::UnsupportedMediaType,
            Self::NotAcceptable { .. } => ErrorCategory::NotAcceptable,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns `true` if the fault was caused by the client.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Returns the plain-text description sent to clients.
    ///
    /// Server-side faults never leak their message or source.
    #[must_use]
    pub fn public_description(&self) -> String {
        match self {
            Self::Configuration { .. } | Self::Internal { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}
