//! `multipart/mixed` request bodies.
//!
//! A multipart body carries one value per part. Body arguments are read from
//! the parts in declaration order, each negotiated by the part's own
//! `Content-Type`.
//!
//! # Example
//!
//! ```rust
//! use hydrant_convert::multipart::read_parts;
//! use hydrant_core::RequestInfo;
//! use http::{header, HeaderValue, Method, Uri};
//!
//! # tokio_test::block_on(async {
//! let request = RequestInfo::new(Method::POST, Uri::from_static("/api/calculator/modulo"))
//!     .with_header(
//!         header::CONTENT_TYPE,
//!         HeaderValue::from_static("multipart/mixed; boundary=test"),
//!     )
//!     .with_body("--test\r\nContent-Type: text/plain\r\n\r\n1\r\n--test--");
//!
//! let parts = read_parts(&request).await.unwrap().unwrap();
//! assert_eq!(parts.len(), 1);
//! assert_eq!(parts[0].body().as_ref(), b"1");
//! # });
//! ```

use std::io;

use bytes::Bytes;
use http::HeaderMap;
use hydrant_core::RequestInfo;
use tracing::debug;

use crate::error::ConversionError;
use crate::media;

/// `multipart/mixed` media type.
pub const MULTIPART_MIXED: &str = "multipart/mixed";

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPart {
    headers: HeaderMap,
    body: Bytes,
}

impl BodyPart {
    /// Creates a part.
    #[must_use]
    pub fn new(headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Headers of this part.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Content of this part.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// This part as a request of its own, so converters rank it by the
    /// part's headers.
    #[must_use]
    pub fn to_request(&self, request: &RequestInfo) -> RequestInfo {
        RequestInfo::new(request.method().clone(), request.uri().clone())
            .with_headers(self.headers.clone())
            .with_body(self.body.clone())
            .with_identity(request.identity().clone())
    }
}

/// Whether the request declares a `multipart/mixed` body.
#[must_use]
pub fn is_multipart(request: &RequestInfo) -> bool {
    media::content_type(request.headers()).is_some_and(|ct| media::names(&ct, MULTIPART_MIXED))
}

/// Splits a `multipart/mixed` request body into its parts.
///
/// Returns `None` for any other content type. An empty body has no parts.
///
/// # Errors
///
/// Returns a conversion error when the boundary parameter is missing or the
/// body is not a well-formed multipart document.
pub async fn read_parts(request: &RequestInfo) -> Result<Option<Vec<BodyPart>>, ConversionError> {
    let Some(content_type) = media::content_type(request.headers()) else {
        return Ok(None);
    };
    if !media::names(&content_type, MULTIPART_MIXED) {
        return Ok(None);
    }
    let boundary = content_type
        .get_param(mime::BOUNDARY)
        .map(|boundary| boundary.as_str().to_string())
        .ok_or_else(|| ConversionError::multipart("missing boundary in multipart Content-Type"))?;
    if request.body().is_empty() {
        return Ok(Some(Vec::new()));
    }

    let body = request.body().clone();
    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ConversionError::multipart)?
    {
        let headers = field.headers().clone();
        let body = field.bytes().await.map_err(ConversionError::multipart)?;
        parts.push(BodyPart::new(headers, body));
    }

    debug!(parts = parts.len(), "read multipart body");
    Ok(Some(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use http::{HeaderValue, Method, Uri};

    const BODY: &str = "--test\r\nContent-Type: text/plain\r\nContent-Length:3\r\n\r\n1\r\n\
                        --test\r\nContent-Type: text/plain\r\nContent-Length:3\r\n\r\n2\r\n--test--";

    fn request(content_type: &'static str, body: &'static str) -> RequestInfo {
        RequestInfo::new(Method::POST, Uri::from_static("/api/calculator/modulo"))
            .with_header(CONTENT_TYPE, HeaderValue::from_static(content_type))
            .with_body(body)
    }

    #[tokio::test]
    async fn test_read_two_parts() {
        let parts = read_parts(&request("multipart/mixed; boundary=test", BODY))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].body().as_ref(), b"1");
        assert_eq!(parts[1].body().as_ref(), b"2");
        assert_eq!(
            parts[1].headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("text/plain"))
        );
    }

    #[tokio::test]
    async fn test_other_content_types_have_no_parts() {
        let parts = read_parts(&request("application/json", "{}")).await.unwrap();
        assert!(parts.is_none());
        assert!(!is_multipart(&request("application/json", "{}")));
    }

    #[tokio::test]
    async fn test_missing_boundary() {
        let err = read_parts(&request("multipart/mixed", BODY)).await.unwrap_err();
        assert!(matches!(err, ConversionError::Multipart { .. }));
    }

    #[tokio::test]
    async fn test_empty_body_has_no_parts() {
        let parts = read_parts(&request("multipart/mixed; boundary=test", ""))
            .await
            .unwrap()
            .unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn test_part_as_request() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let part = BodyPart::new(headers, "7");

        let outer = request("multipart/mixed; boundary=test", BODY);
        let inner = part.to_request(&outer);

        assert_eq!(inner.header_str(CONTENT_TYPE), Some("text/plain"));
        assert_eq!(inner.body().as_ref(), b"7");
        assert_eq!(inner.path(), "/api/calculator/modulo");
        assert!(is_multipart(&outer));
    }
}
