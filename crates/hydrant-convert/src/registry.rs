//! Ordered converter registry and selection.

use std::sync::Arc;

use bytes::Bytes;
use hydrant_core::{HydrantResult, RequestInfo, TypeShape};
use serde_json::Value;
use tracing::debug;

use crate::converter::Converter;
use crate::error::NegotiationError;
use crate::form::FormUrlEncodedConverter;
use crate::json::JsonConverter;
use crate::level::CompatibilityLevel;
use crate::media;
use crate::text::PlainTextConverter;

/// A serialized response body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    /// Serialized body.
    pub body: Bytes,
    /// Media type to send as `Content-Type`.
    pub content_type: &'static str,
}

/// Converters in registration order.
///
/// Selection picks the highest [`CompatibilityLevel`] among converters that
/// support the shape; ties go to the converter registered first. The
/// registry is immutable once handed to the dispatcher and shared behind
/// `Arc`.
///
/// # Example
///
/// ```
/// use hydrant_convert::ConverterRegistry;
/// use hydrant_core::{RequestInfo, TypeShape};
/// use http::{header, HeaderValue, Method, Uri};
///
/// let registry = ConverterRegistry::with_defaults();
/// let request = RequestInfo::new(Method::GET, Uri::from_static("/api/product/1/name"))
///     .with_header(header::ACCEPT, HeaderValue::from_static("text/plain"));
///
/// let converter = registry.select_outbound(&TypeShape::String, &request).unwrap();
/// assert_eq!(converter.content_type(), "text/plain");
///
/// // Without a protocol match the first registered converter (JSON) wins.
/// let request = RequestInfo::new(Method::GET, Uri::from_static("/api/product/1/name"));
/// let converter = registry.select_outbound(&TypeShape::String, &request).unwrap();
/// assert_eq!(converter.content_type(), "application/json");
/// ```
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn Converter>>,
    strict_accept: bool,
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("media_types", &self.media_types())
            .field("strict_accept", &self.strict_accept)
            .finish()
    }
}

impl ConverterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON, plain text and URL-encoded form, in that order.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with(JsonConverter)
            .with(PlainTextConverter)
            .with(FormUrlEncodedConverter)
    }

    /// Appends a converter.
    #[must_use]
    pub fn with<C: Converter>(mut self, converter: C) -> Self {
        self.register(converter);
        self
    }

    /// Appends a converter.
    pub fn register<C: Converter>(&mut self, converter: C) {
        self.converters.push(Arc::new(converter));
    }

    /// Rejects explicit `Accept` headers naming no registered media type.
    #[must_use]
    pub fn strict_accept(mut self, strict: bool) -> Self {
        self.strict_accept = strict;
        self
    }

    /// Whether strict `Accept` handling is on.
    #[must_use]
    pub const fn is_strict_accept(&self) -> bool {
        self.strict_accept
    }

    /// Returns the number of converters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns `true` if no converters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Every media type, in registration order.
    #[must_use]
    pub fn media_types(&self) -> Vec<&'static str> {
        self.converters
            .iter()
            .flat_map(|c| c.media_types().iter().copied())
            .collect()
    }

    fn best<'a>(
        candidates: impl Iterator<Item = &'a Arc<dyn Converter>>,
        rank: impl Fn(&dyn Converter) -> CompatibilityLevel,
    ) -> Option<&'a dyn Converter> {
        let mut best: Option<(&'a dyn Converter, CompatibilityLevel)> = None;
        for converter in candidates {
            let level = rank(converter.as_ref());
            if !level.has_type_match() {
                continue;
            }
            if best.map_or(true, |(_, current)| level > current) {
                best = Some((converter.as_ref(), level));
            }
        }
        best.map(|(converter, _)| converter)
    }

    /// Selects the converter that reads the request body into `shape`.
    pub fn select_inbound(
        &self,
        shape: &TypeShape,
        request: &RequestInfo,
    ) -> Result<&dyn Converter, NegotiationError> {
        Self::best(self.converters.iter(), |c| c.rank_inbound(shape, request)).ok_or_else(|| {
            NegotiationError::UnsupportedMediaType {
                content_type: media::content_type(request.headers())
                    .map_or_else(|| "none".to_string(), |m| m.essence_str().to_string()),
                shape: shape.clone(),
            }
        })
    }

    /// Selects the converter that writes `shape` for the request.
    pub fn select_outbound(
        &self,
        shape: &TypeShape,
        request: &RequestInfo,
    ) -> Result<&dyn Converter, NegotiationError> {
        let accepted = media::accepted(request.headers());
        let restrict = self.strict_accept && !accepted.is_empty();
        let candidates = self.converters.iter().filter(|c| {
            !restrict
                || accepted
                    .iter()
                    .any(|range| c.media_types().iter().any(|m| media::covers(range, m)))
        });

        Self::best(candidates, |c| c.rank_outbound(shape, request)).ok_or_else(|| {
            NegotiationError::NotAcceptable {
                accept: request
                    .header_str(http::header::ACCEPT)
                    .unwrap_or("*/*")
                    .to_string(),
                shape: shape.clone(),
            }
        })
    }

    /// Selects a converter by media type, bypassing `Accept`.
    #[must_use]
    pub fn select_for_media(&self, shape: &TypeShape, media_type: &str) -> Option<&dyn Converter> {
        self.converters
            .iter()
            .find(|c| c.handles(media_type) && c.supports_outbound(shape))
            .map(|c| &**c)
    }

    /// Reads the request body as `shape`.
    ///
    /// An empty body yields the shape's zero value without negotiation.
    pub fn read(&self, shape: &TypeShape, request: &RequestInfo) -> HydrantResult<Value> {
        if request.body().is_empty() {
            return Ok(shape.zero_value());
        }
        let converter = self.select_inbound(shape, request)?;
        debug!(
            content_type = converter.content_type(),
            shape = %shape,
            "reading request body"
        );
        Ok(converter.read(shape, request.body())?)
    }

    /// Writes `value` with the converter selected for the request.
    pub fn write(
        &self,
        shape: &TypeShape,
        value: &Value,
        request: &RequestInfo,
    ) -> HydrantResult<Written> {
        let converter = self.select_outbound(shape, request)?;
        Self::write_with(converter, shape, value)
    }

    /// Writes `value` with a specific converter.
    pub fn write_with(
        converter: &dyn Converter,
        shape: &TypeShape,
        value: &Value,
    ) -> HydrantResult<Written> {
        let body = converter.write(shape, value)?;
        Ok(Written {
            body,
            content_type: converter.content_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{header, HeaderValue, Method, StatusCode, Uri};
    use serde_json::json;

    fn request() -> RequestInfo {
        RequestInfo::new(Method::POST, Uri::from_static("/api/product"))
    }

    #[test]
    fn test_selection_is_deterministic() {
        let registry = ConverterRegistry::with_defaults();
        let request = request().with_header(header::ACCEPT, HeaderValue::from_static("*/*"));

        for _ in 0..10 {
            let converter = registry.select_outbound(&TypeShape::Integer, &request).unwrap();
            assert_eq!(converter.content_type(), "application/json");
        }
    }

    #[test]
    fn test_exact_match_beats_earlier_type_match() {
        let registry = ConverterRegistry::with_defaults();
        let request = request()
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .with_body("42");

        let converter = registry.select_inbound(&TypeShape::Integer, &request).unwrap();
        assert_eq!(converter.content_type(), "text/plain");
        assert_eq!(registry.read(&TypeShape::Integer, &request).unwrap(), json!(42));
    }

    #[test]
    fn test_protocol_match_without_type_match_is_skipped() {
        let registry = ConverterRegistry::with_defaults();
        let request = request()
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .with_body(r#"{"id":1}"#);

        // text/plain cannot read objects, JSON still can.
        let converter = registry
            .select_inbound(&TypeShape::object("Product"), &request)
            .unwrap();
        assert_eq!(converter.content_type(), "application/json");
    }

    #[test]
    fn test_form_body() {
        let registry = ConverterRegistry::with_defaults();
        let request = request()
            .with_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .with_body("name=Widget&price=3");

        let value = registry.read(&TypeShape::object("Product"), &request).unwrap();
        assert_eq!(value, json!({ "name": "Widget", "price": 3 }));
    }

    #[test]
    fn test_unsupported_media_type() {
        let registry = ConverterRegistry::new().with(PlainTextConverter);
        let request = request().with_body(r#"{"id":1}"#);

        let error = registry
            .read(&TypeShape::object("Product"), &request)
            .unwrap_err();
        assert_eq!(error.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_not_acceptable_when_no_type_match() {
        let registry = ConverterRegistry::new().with(PlainTextConverter);
        let error = registry
            .write(&TypeShape::object("Product"), &json!({}), &request())
            .unwrap_err();
        assert_eq!(error.status_code(), StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn test_lenient_accept_falls_back() {
        let registry = ConverterRegistry::with_defaults();
        let request = request().with_header(header::ACCEPT, HeaderValue::from_static("image/png"));
        let written = registry
            .write(&TypeShape::object("Product"), &json!({ "id": 1 }), &request)
            .unwrap();
        assert_eq!(written.content_type, "application/json");
    }

    #[test]
    fn test_strict_accept() {
        let registry = ConverterRegistry::with_defaults().strict_accept(true);

        let png = request().with_header(header::ACCEPT, HeaderValue::from_static("image/png"));
        assert!(registry.select_outbound(&TypeShape::Integer, &png).is_err());

        let any = request().with_header(header::ACCEPT, HeaderValue::from_static("image/png, */*"));
        assert!(registry.select_outbound(&TypeShape::Integer, &any).is_ok());

        let text = request().with_header(header::ACCEPT, HeaderValue::from_static("text/*"));
        let converter = registry.select_outbound(&TypeShape::Integer, &text).unwrap();
        assert_eq!(converter.content_type(), "text/plain");

        let none = request();
        assert!(registry.select_outbound(&TypeShape::Integer, &none).is_ok());
    }

    #[test]
    fn test_empty_body_yields_zero_value() {
        let registry = ConverterRegistry::with_defaults();
        let request = request().with_header(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));

        assert_eq!(registry.read(&TypeShape::Integer, &request).unwrap(), json!(0));
        assert_eq!(registry.read(&TypeShape::Bool, &request).unwrap(), json!(false));
        assert_eq!(
            registry.read(&TypeShape::object("Product"), &request).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_select_for_media() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.select_for_media(&TypeShape::Integer, "text/plain").is_some());
        assert!(registry
            .select_for_media(&TypeShape::object("Product"), "text/plain")
            .is_none());
    }

    #[test]
    fn test_read_invalid_body_is_bad_request() {
        let registry = ConverterRegistry::with_defaults();
        let request = request()
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body("{nope");
        let error = registry.read(&TypeShape::object("Product"), &request).unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
