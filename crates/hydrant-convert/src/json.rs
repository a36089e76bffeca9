//! JSON converter.

use bytes::Bytes;
use hydrant_core::TypeShape;
use serde_json::Value;

use crate::converter::Converter;
use crate::error::ConversionError;

/// `application/json` media type.
pub const APPLICATION_JSON: &str = "application/json";

/// Reads and writes every shape as JSON.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hydrant_convert::{Converter, JsonConverter};
/// use hydrant_core::TypeShape;
/// use serde_json::json;
///
/// let shape = TypeShape::object("Product");
/// let value = JsonConverter.read(&shape, &Bytes::from_static(br#"{"id":1}"#)).unwrap();
///
/// assert_eq!(value, json!({ "id": 1 }));
/// assert_eq!(JsonConverter.write(&shape, &value).unwrap().as_ref(), br#"{"id":1}"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverter;

impl Converter for JsonConverter {
    fn media_types(&self) -> &[&'static str] {
        &[APPLICATION_JSON]
    }

    fn supports_inbound(&self, shape: &TypeShape) -> bool {
        !matches!(shape, TypeShape::Principal)
    }

    fn supports_outbound(&self, shape: &TypeShape) -> bool {
        !matches!(shape, TypeShape::Principal)
    }

    fn read(&self, shape: &TypeShape, body: &Bytes) -> Result<Value, ConversionError> {
        serde_json::from_slice(body).map_err(|e| ConversionError::read(APPLICATION_JSON, shape, e))
    }

    fn write(&self, shape: &TypeShape, value: &Value) -> Result<Bytes, ConversionError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| ConversionError::write(APPLICATION_JSON, shape, e))
    }
}
