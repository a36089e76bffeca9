//! The response envelope produced by the dispatcher.

use bytes::Bytes;
use http::header::{self, AsHeaderName, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

use crate::error::HydrantError;

/// Media type of plain-text fault descriptions.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// A fully buffered HTTP response.
///
/// # Example
///
/// ```
/// use hydrant_core::{HydrantError, ResponseInfo};
/// use http::StatusCode;
///
/// let response = ResponseInfo::from_error(&HydrantError::not_found("no product 7"));
/// assert_eq!(response.status(), StatusCode::NOT_FOUND);
/// assert_eq!(response.body_str(), Some("Not found: no product 7"));
/// ```
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseInfo {
    /// Creates an empty response.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a plain-text response.
    #[must_use]
    pub fn text(status: StatusCode, text: impl Into<String>) -> Self {
        Self::new(status)
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8))
            .with_body(text.into())
    }

    /// Converts a fault into its plain-text response.
    ///
    /// `405` responses carry the `Allow` header.
    #[must_use]
    pub fn from_error(error: &HydrantError) -> Self {
        let mut response = Self::text(error.status_code(), error.public_description());
        if let HydrantError::MethodNotAllowed { allowed, .. } = error {
            let allow = allowed
                .iter()
                .map(http::Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers.insert(header::ALLOW, value);
            }
        }
        response
    }

    /// Sets a header, replacing previous values.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the headers mutably.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header_str<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as UTF-8 text.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Converts into an `http::Response` for a host adapter.
    #[must_use]
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
