//! Plain-text converter for scalar shapes.

use bytes::Bytes;
use hydrant_core::TypeShape;
use serde_json::Value;

use crate::converter::Converter;
use crate::error::ConversionError;
use crate::scalar::{format_scalar, parse_scalar};

/// `text/plain` media type.
pub const TEXT_PLAIN: &str = "text/plain";

/// Reads and writes scalar shapes as bare text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextConverter;

impl Converter for PlainTextConverter {
    fn media_types(&self) -> &[&'static str] {
        &[TEXT_PLAIN]
    }

    fn supports_inbound(&self, shape: &TypeShape) -> bool {
        shape.is_scalar()
    }

    fn supports_outbound(&self, shape: &TypeShape) -> bool {
        shape.is_scalar()
    }

    fn read(&self, shape: &TypeShape, body: &Bytes) -> Result<Value, ConversionError> {
        let text = std::str::from_utf8(body).map_err(|e| ConversionError::read(TEXT_PLAIN, shape, e))?;
        parse_scalar(shape, text).map_err(|e| ConversionError::read(TEXT_PLAIN, shape, e))
    }

    fn write(&self, shape: &TypeShape, value: &Value) -> Result<Bytes, ConversionError> {
        if value.is_object() || value.is_array() {
            return Err(ConversionError::write(TEXT_PLAIN, shape, "value is not a scalar"));
        }
        Ok(Bytes::from(format_scalar(value)))
    }
}
