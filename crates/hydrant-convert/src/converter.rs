//! The converter trait.

use bytes::Bytes;
use hydrant_core::{RequestInfo, TypeShape};
use serde_json::Value;

use crate::error::ConversionError;
use crate::level::CompatibilityLevel;
use crate::media;

/// Reads request bodies into values and writes values into response bodies.
///
/// Values travel as [`serde_json::Value`]; typed (de)serialization happens
/// at the controller boundary. Ranking is provided: implementors only
/// declare which shapes they support in each direction.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hydrant_convert::{CompatibilityLevel, ConversionError, Converter};
/// use hydrant_core::{RequestInfo, TypeShape};
/// use http::{header, HeaderValue, Method, Uri};
/// use serde_json::Value;
///
/// struct Csv;
///
/// impl Converter for Csv {
///     fn media_types(&self) -> &[&'static str] {
///         &["text/csv"]
///     }
///
///     fn supports_inbound(&self, _shape: &TypeShape) -> bool {
///         false
///     }
///
///     fn supports_outbound(&self, shape: &TypeShape) -> bool {
///         matches!(shape, TypeShape::Sequence(_))
///     }
///
///     fn read(&self, shape: &TypeShape, _body: &Bytes) -> Result<Value, ConversionError> {
///         Err(ConversionError::read("text/csv", shape, "write-only"))
///     }
///
///     fn write(&self, _shape: &TypeShape, value: &Value) -> Result<Bytes, ConversionError> {
///         Ok(Bytes::from(value.to_string()))
///     }
/// }
///
/// let request = RequestInfo::new(Method::GET, Uri::from_static("/report"))
///     .with_header(header::ACCEPT, HeaderValue::from_static("text/csv"));
/// let shape = TypeShape::sequence(TypeShape::Integer);
///
/// assert_eq!(Csv.rank_outbound(&shape, &request), CompatibilityLevel::ExactMatch);
/// assert_eq!(Csv.rank_inbound(&shape, &request), CompatibilityLevel::NoMatch);
/// ```
pub trait Converter: Send + Sync + 'static {
    /// Media types handled, the first one being written as `Content-Type`.
    fn media_types(&self) -> &[&'static str];

    /// Whether bodies can be read into this shape.
    fn supports_inbound(&self, shape: &TypeShape) -> bool;

    /// Whether values of this shape can be written.
    fn supports_outbound(&self, shape: &TypeShape) -> bool;

    /// Reads a non-empty body.
    fn read(&self, shape: &TypeShape, body: &Bytes) -> Result<Value, ConversionError>;

    /// Writes a value.
    fn write(&self, shape: &TypeShape, value: &Value) -> Result<Bytes, ConversionError>;

    /// The `Content-Type` written with response bodies.
    fn content_type(&self) -> &'static str {
        self.media_types().first().copied().unwrap_or("application/octet-stream")
    }

    /// Whether `media` is one of this converter's media types.
    fn handles(&self, media: &str) -> bool {
        self.media_types()
            .iter()
            .any(|m| m.eq_ignore_ascii_case(media))
    }

    /// Ranks this converter for reading the request body into `shape`.
    fn rank_inbound(&self, shape: &TypeShape, request: &RequestInfo) -> CompatibilityLevel {
        let protocol = media::content_type(request.headers())
            .is_some_and(|ct| self.handles(ct.essence_str()));
        CompatibilityLevel::from_parts(self.supports_inbound(shape), protocol)
    }

    /// Ranks this converter for writing `shape` in response to the request.
    fn rank_outbound(&self, shape: &TypeShape, request: &RequestInfo) -> CompatibilityLevel {
        let protocol = media::accepted(request.headers())
            .iter()
            .any(|range| self.handles(range.essence_str()));
        CompatibilityLevel::from_parts(self.supports_outbound(shape), protocol)
    }
}
