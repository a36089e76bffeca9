//! URL-encoded form converter (inbound objects only).

use bytes::Bytes;
use hydrant_core::TypeShape;
use serde_json::{Map, Value};

use crate::converter::Converter;
use crate::error::ConversionError;

/// `application/x-www-form-urlencoded` media type.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Reads form bodies into objects.
///
/// Field values that look like integers, floats or booleans become JSON
/// numbers or booleans so that typed entities deserialize; repeated keys
/// become arrays.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hydrant_convert::{Converter, FormUrlEncodedConverter};
/// use hydrant_core::TypeShape;
/// use serde_json::json;
///
/// let value = FormUrlEncodedConverter
///     .read(&TypeShape::object("Product"), &Bytes::from_static(b"name=Big+Box&price=12.5"))
///     .unwrap();
///
/// assert_eq!(value, json!({ "name": "Big Box", "price": 12.5 }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FormUrlEncodedConverter;

impl Converter for FormUrlEncodedConverter {
    fn media_types(&self) -> &[&'static str] {
        &[FORM_URLENCODED]
    }

    fn supports_inbound(&self, shape: &TypeShape) -> bool {
        matches!(shape, TypeShape::Object(_))
    }

    fn supports_outbound(&self, _shape: &TypeShape) -> bool {
        false
    }

    fn read(&self, shape: &TypeShape, body: &Bytes) -> Result<Value, ConversionError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| ConversionError::read(FORM_URLENCODED, shape, e))?;

        let mut object = Map::new();
        for (key, raw) in pairs {
            let value = infer(&raw);
            match object.get_mut(&key) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    object.insert(key, value);
                }
            }
        }
        Ok(Value::Object(object))
    }

    fn write(&self, shape: &TypeShape, _value: &Value) -> Result<Bytes, ConversionError> {
        Err(ConversionError::write(FORM_URLENCODED, shape, "form bodies are inbound only"))
    }
}

fn infer(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Some(n) = raw
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
    {
        return Value::Number(n);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inbound_objects_only() {
        assert!(FormUrlEncodedConverter.supports_inbound(&TypeShape::object("Product")));
        assert!(!FormUrlEncodedConverter.supports_inbound(&TypeShape::Integer));
        assert!(!FormUrlEncodedConverter.supports_outbound(&TypeShape::object("Product")));
    }

    #[test]
    fn test_repeated_keys() {
        let value = FormUrlEncodedConverter
            .read(&TypeShape::object("Tags"), &Bytes::from_static(b"tag=a&tag=b&tag=c"))
            .unwrap();
        assert_eq!(value, json!({ "tag": ["a", "b", "c"] }));
    }

    #[test]
    fn test_inference() {
        let value = FormUrlEncodedConverter
            .read(
                &TypeShape::object("Flags"),
                &Bytes::from_static(b"on=true&count=3&label=inf"),
            )
            .unwrap();
        assert_eq!(value, json!({ "on": true, "count": 3, "label": "inf" }));
    }

    #[test]
    fn test_write_fails() {
        assert!(FormUrlEncodedConverter
            .write(&TypeShape::object("Product"), &json!({}))
            .is_err());
    }
}
