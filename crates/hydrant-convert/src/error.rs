//! Negotiation and conversion errors.

use hydrant_core::{HydrantError, TypeShape};
use thiserror::Error;

/// No converter fits the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    /// No converter can read the body into the target shape.
    #[error("no converter reads '{content_type}' into {shape}")]
    UnsupportedMediaType {
        /// The request content type, or `none`.
        content_type: String,
        /// The target shape.
        shape: TypeShape,
    },

    /// No converter can write the shape in an acceptable format.
    #[error("no converter writes {shape} as '{accept}'")]
    NotAcceptable {
        /// The request `Accept` header, or `*/*`.
        accept: String,
        /// The source shape.
        shape: TypeShape,
    },

    /// Several body arguments were bound from a body that is not multipart.
    #[error("{bodies} body arguments need a multipart/mixed body, got '{content_type}'")]
    MultipartRequired {
        /// The request content type, or `none`.
        content_type: String,
        /// Number of body arguments.
        bodies: usize,
    },
}

/// A converter was selected but failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The body could not be read into the target shape.
    #[error("cannot read {media_type} body as {shape}: {message}")]
    Read {
        /// Converter media type.
        media_type: String,
        /// Target shape.
        shape: TypeShape,
        /// Underlying failure.
        message: String,
    },

    /// The value could not be written.
    #[error("cannot write {shape} as {media_type}: {message}")]
    Write {
        /// Converter media type.
        media_type: String,
        /// Source shape.
        shape: TypeShape,
        /// Underlying failure.
        message: String,
    },

    /// A multipart body could not be split into parts.
    #[error("malformed multipart body: {message}")]
    Multipart {
        /// Underlying failure.
        message: String,
    },
}

impl ConversionError {
    /// Creates a read failure.
    pub fn read(media_type: &str, shape: &TypeShape, message: impl ToString) -> Self {
        Self::Read {
            media_type: media_type.to_string(),
            shape: shape.clone(),
            message: message.to_string(),
        }
    }

    /// Creates a multipart failure.
    pub fn multipart(message: impl ToString) -> Self {
        Self::Multipart {
            message: message.to_string(),
        }
    }

    /// Creates a write failure.
    pub fn write(media_type: &str, shape: &TypeShape, message: impl ToString) -> Self {
        Self::Write {
            media_type: media_type.to_string(),
            shape: shape.clone(),
            message: message.to_string(),
        }
    }
}

impl From<NegotiationError> for HydrantError {
    fn from(error: NegotiationError) -> Self {
        match error {
            NegotiationError::UnsupportedMediaType { .. }
            | NegotiationError::MultipartRequired { .. } => {
                Self::unsupported_media_type(error.to_string())
            }
            NegotiationError::NotAcceptable { .. } => Self::not_acceptable(error.to_string()),
        }
    }
}

impl From<ConversionError> for HydrantError {
    fn from(error: ConversionError) -> Self {
        match error {
            ConversionError::Read { .. } | ConversionError::Multipart { .. } => {
                Self::bad_request(error.to_string())
            }
            ConversionError::Write { .. } => {
                Self::internal_with_source("response serialization failed", error)
            }
        }
    }
}
