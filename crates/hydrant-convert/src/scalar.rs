//! Textual scalar values.
//!
//! URL segments, query values, headers and plain-text bodies all carry
//! values as text. [`parse_scalar`] turns such text into the JSON value of a
//! declared shape; [`format_scalar`] goes the other way.

use chrono::{DateTime, SecondsFormat, Utc};
use hydrant_core::{FilterExpression, TypeShape};
use serde_json::Value;
use uuid::Uuid;

/// Parses text into a value of the given shape.
///
/// Sequences accept comma-separated items.
///
/// # Example
///
/// ```
/// use hydrant_convert::parse_scalar;
/// use hydrant_core::TypeShape;
/// use serde_json::json;
///
/// assert_eq!(parse_scalar(&TypeShape::Integer, "42").unwrap(), json!(42));
/// assert_eq!(
///     parse_scalar(&TypeShape::sequence(TypeShape::Integer), "1,2,3").unwrap(),
///     json!([1, 2, 3])
/// );
/// assert!(parse_scalar(&TypeShape::Bool, "maybe").is_err());
/// ```
pub fn parse_scalar(shape: &TypeShape, raw: &str) -> Result<Value, String> {
    let text = raw.trim();
    match shape {
        TypeShape::Bool => match text.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(format!("'{text}' is not a boolean")),
        },
        TypeShape::Integer | TypeShape::Identity(_) => text
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| text.parse::<u64>().map(Value::from))
            .map_err(|_| format!("'{text}' is not an integer")),
        TypeShape::Float => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("'{text}' is not a number")),
        TypeShape::String => Ok(Value::String(raw.to_string())),
        TypeShape::Uuid => Uuid::parse_str(text)
            .map(|id| Value::String(id.to_string()))
            .map_err(|e| format!("'{text}' is not a UUID: {e}")),
        TypeShape::Timestamp => DateTime::parse_from_rfc3339(text)
            .map(|t| {
                Value::String(
                    t.with_timezone(&Utc)
                        .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                )
            })
            .map_err(|e| format!("'{text}' is not an RFC 3339 timestamp: {e}")),
        TypeShape::Sequence(item) => {
            if text.is_empty() {
                return Ok(Value::Array(Vec::new()));
            }
            text.split(',')
                .map(|part| parse_scalar(item, part))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        TypeShape::Filter => FilterExpression::parse(text)
            .map(|filter| Value::String(filter.to_string()))
            .map_err(|e| e.to_string()),
        TypeShape::Unit => Ok(Value::Null),
        TypeShape::Object(_) | TypeShape::Graph | TypeShape::Principal => {
            serde_json::from_str(text).map_err(|e| format!("'{text}' is not a JSON document: {e}"))
        }
    }
}

/// Formats a value as header-friendly text.
///
/// Strings are written without quotes, `null` as the empty string and
/// arrays as comma-separated items.
#[must_use]
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(format_scalar).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_scalar(&TypeShape::Bool, "TRUE").unwrap(), json!(true));
        assert_eq!(parse_scalar(&TypeShape::Bool, "0").unwrap(), json!(false));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_scalar(&TypeShape::Integer, "-7").unwrap(), json!(-7));
        assert_eq!(
            parse_scalar(&TypeShape::Integer, "18446744073709551615").unwrap(),
            json!(u64::MAX)
        );
        assert!(parse_scalar(&TypeShape::Integer, "1.5").is_err());
        assert_eq!(parse_scalar(&TypeShape::Float, "1.5").unwrap(), json!(1.5));
        assert!(parse_scalar(&TypeShape::Float, "NaN").is_err());
        assert_eq!(
            parse_scalar(&TypeShape::identity("ProductKey"), "9").unwrap(),
            json!(9)
        );
    }

    #[test]
    fn test_parse_string_is_verbatim() {
        assert_eq!(parse_scalar(&TypeShape::String, " padded ").unwrap(), json!(" padded "));
    }

    #[test]
    fn test_parse_uuid_normalizes() {
        let value = parse_scalar(&TypeShape::Uuid, "67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(value, json!("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(parse_scalar(&TypeShape::Uuid, "nope").is_err());
    }

    #[test]
    fn test_parse_timestamp_normalizes_to_utc() {
        let value = parse_scalar(&TypeShape::Timestamp, "2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(value, json!("2024-03-01T10:00:00Z"));
    }

    #[test]
    fn test_parse_sequence() {
        let shape = TypeShape::sequence(TypeShape::Integer);
        assert_eq!(parse_scalar(&shape, "").unwrap(), json!([]));
        assert!(parse_scalar(&shape, "1,x").is_err());
    }

    #[test]
    fn test_parse_filter() {
        let value = parse_scalar(&TypeShape::Filter, "id EQ 3").unwrap();
        assert_eq!(value, json!("id eq 3"));
        assert!(parse_scalar(&TypeShape::Filter, "id").is_err());
    }

    #[test]
    fn test_parse_object() {
        let value = parse_scalar(&TypeShape::object("Product"), r#"{"id":1}"#).unwrap();
        assert_eq!(value, json!({ "id": 1 }));
    }

    #[test]
    fn test_format_scalar() {
        assert_eq!(format_scalar(&json!("abc")), "abc");
        assert_eq!(format_scalar(&json!(12)), "12");
        assert_eq!(format_scalar(&json!(null)), "");
        assert_eq!(format_scalar(&json!([1, "a"])), "1,a");
    }
}
