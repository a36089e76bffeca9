//! The JSON-LD body converter.

use bytes::Bytes;
use hydrant_convert::{ConversionError, Converter};
use hydrant_core::TypeShape;
use serde_json::Value;

/// `application/ld+json`.
pub const APPLICATION_LD_JSON: &str = "application/ld+json";

/// Reads and writes graph documents as JSON-LD.
///
/// Sequences of objects are written too: a JSON array of node objects is a
/// JSON-LD document, and list results may be requested as JSON-LD before a
/// collection projection turns them into a graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdConverter;

impl Converter for JsonLdConverter {
    fn media_types(&self) -> &[&'static str] {
        &[APPLICATION_LD_JSON]
    }

    fn supports_inbound(&self, shape: &TypeShape) -> bool {
        matches!(shape, TypeShape::Graph)
    }

    fn supports_outbound(&self, shape: &TypeShape) -> bool {
        match shape {
            TypeShape::Graph => true,
            TypeShape::Sequence(item) => matches!(**item, TypeShape::Object(_)),
            _ => false,
        }
    }

    fn read(&self, shape: &TypeShape, body: &Bytes) -> Result<Value, ConversionError> {
        serde_json::from_slice(body).map_err(|e| ConversionError::read(APPLICATION_LD_JSON, shape, e))
    }

    fn write(&self, shape: &TypeShape, value: &Value) -> Result<Bytes, ConversionError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| ConversionError::write(APPLICATION_LD_JSON, shape, e))
    }
}
