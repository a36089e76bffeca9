//! The buffered request envelope handed to the dispatcher.
//!
//! [`RequestInfo`] owns everything the dispatcher needs: verb, URL, headers,
//! the fully buffered body and the caller identity. Buffering up front lets
//! content negotiation inspect the body without ever exhausting it.

use bytes::Bytes;
use http::header::{self, AsHeaderName, HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HydrantError, HydrantResult};
use crate::identity::ClaimIdentity;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for log correlation.
///
/// # Example
///
/// ```
/// use hydrant_core::RequestId;
///
/// let id = RequestId::new();
/// assert_ne!(id, RequestId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully buffered HTTP request.
///
/// # Example
///
/// ```
/// use hydrant_core::RequestInfo;
/// use http::{Method, Uri};
///
/// let request = RequestInfo::new(Method::GET, Uri::from_static("http://shop.test/api/product/7?x=1"));
///
/// assert_eq!(request.path(), "/api/product/7");
/// assert_eq!(request.query(), Some("x=1"));
/// assert_eq!(request.base_url(), "http://shop.test");
/// assert_eq!(request.url_without_query(), "http://shop.test/api/product/7");
/// assert!(!request.identity().is_authenticated());
/// ```
#[derive(Debug, Clone)]
pub struct RequestInfo {
    request_id: RequestId,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    identity: ClaimIdentity,
}

impl RequestInfo {
    /// Creates a request with no headers, an empty body and an anonymous caller.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            identity: ClaimIdentity::anonymous(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the buffered body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the caller identity.
    #[must_use]
    pub fn with_identity(mut self, identity: ClaimIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Buffers an `http::Request` into a `RequestInfo`.
    ///
    /// A [`ClaimIdentity`] stored in the request extensions is carried over.
    pub async fn from_http<B>(request: http::Request<B>) -> HydrantResult<Self>
    where
        B: http_body::Body,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = request.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| HydrantError::bad_request(format!("failed to read request body: {e}")))?
            .to_bytes();
        let identity = parts
            .extensions
            .get::<ClaimIdentity>()
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            request_id: RequestId::new(),
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            identity,
        })
    }

    /// Parses a raw HTTP/1.x message: request line, headers, blank line, body.
    ///
    /// # Example
    ///
    /// ```
    /// use hydrant_core::RequestInfo;
    ///
    /// let request = RequestInfo::parse(
    ///     "POST /api/product HTTP/1.1\r\nHost: shop.test\r\nContent-Type: application/json\r\n\r\n{\"name\":\"x\"}",
    /// ).unwrap();
    ///
    /// assert_eq!(request.method(), "POST");
    /// assert_eq!(request.base_url(), "http://shop.test");
    /// assert_eq!(request.body().as_ref(), b"{\"name\":\"x\"}");
    /// ```
    pub fn parse(raw: &str) -> HydrantResult<Self> {
        let (head, body) = raw
            .split_once("\r\n\r\n")
            .or_else(|| raw.split_once("\n\n"))
            .unwrap_or((raw, ""));
        let mut lines = head.lines();

        let request_line = lines
            .next()
            .ok_or_else(|| HydrantError::bad_request("empty request message"))?;
        let mut parts = request_line.split_whitespace();
        let method = parts
            .next()
            .ok_or_else(|| HydrantError::bad_request("missing request method"))?;
        let target = parts
            .next()
            .ok_or_else(|| HydrantError::bad_request("missing request target"))?;

        let method = Method::from_bytes(method.as_bytes())
            .map_err(|e| HydrantError::bad_request(format!("invalid method: {e}")))?;
        let uri = target
            .parse::<Uri>()
            .map_err(|e| HydrantError::bad_request(format!("invalid request target: {e}")))?;

        let mut headers = HeaderMap::new();
        for line in lines.filter(|l| !l.trim().is_empty()) {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| HydrantError::bad_request(format!("malformed header line '{line}'")))?;
            let name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|e| HydrantError::bad_request(format!("invalid header name: {e}")))?;
            let value = HeaderValue::from_str(value.trim())
                .map_err(|e| HydrantError::bad_request(format!("invalid header value: {e}")))?;
            headers.append(name, value);
        }

        Ok(Self::new(method, uri)
            .with_headers(headers)
            .with_body(Bytes::copy_from_slice(body.as_bytes())))
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI as received.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the URL path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the raw query string.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header_str<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the buffered body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the caller identity.
    #[must_use]
    pub const fn identity(&self) -> &ClaimIdentity {
        &self.identity
    }

    /// Returns the `Origin` header.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.header_str(header::ORIGIN)
    }

    /// `OPTIONS` carrying both `Origin` and `Access-Control-Request-Method`.
    #[must_use]
    pub fn is_cors_preflight(&self) -> bool {
        self.method == Method::OPTIONS
            && self.headers.contains_key(header::ORIGIN)
            && self.headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
    }

    /// Scheme and authority, e.g. `http://shop.test`.
    ///
    /// Relative URIs fall back to the `Host` header, then `localhost`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = self.uri.scheme_str().unwrap_or("http");
        let authority = self
            .uri
            .authority()
            .map(|a| a.as_str())
            .or_else(|| self.header_str(header::HOST))
            .unwrap_or("localhost");
        format!("{scheme}://{authority}")
    }

    /// Absolute request URL without the query string.
    #[must_use]
    pub fn url_without_query(&self) -> String {
        format!("{}{}", self.base_url(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[test]
    fn test_relative_uri_uses_host_header() {
        let request = RequestInfo::new(Method::GET, Uri::from_static("/api/product"))
            .with_header(header::HOST, HeaderValue::from_static("shop.test:8080"));
        assert_eq!(request.base_url(), "http://shop.test:8080");
        assert_eq!(request.url_without_query(), "http://shop.test:8080/api/product");
    }

    #[test]
    fn test_relative_uri_without_host() {
        let request = RequestInfo::new(Method::GET, Uri::from_static("/api"));
        assert_eq!(request.base_url(), "http://localhost");
    }

    #[test]
    fn test_cors_preflight_detection() {
        let plain = RequestInfo::new(Method::OPTIONS, Uri::from_static("/api"));
        assert!(!plain.is_cors_preflight());

        let origin_only = plain
            .clone()
            .with_header(header::ORIGIN, HeaderValue::from_static("http://app.test"));
        assert!(!origin_only.is_cors_preflight());

        let preflight = origin_only.with_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("PUT"),
        );
        assert!(preflight.is_cors_preflight());
        assert_eq!(preflight.origin(), Some("http://app.test"));

        let get = RequestInfo::new(Method::GET, Uri::from_static("/api"))
            .with_header(header::ORIGIN, HeaderValue::from_static("http://app.test"))
            .with_header(header::ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("PUT"));
        assert!(!get.is_cors_preflight());
    }

    #[test]
    fn test_parse_raw_message() {
        let request = RequestInfo::parse(
            "PUT /api/product/3?x=1 HTTP/1.1\nHost: shop.test\nAccept: application/json\n\n{\"id\":3}",
        )
        .unwrap();

        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.path(), "/api/product/3");
        assert_eq!(request.query(), Some("x=1"));
        assert_eq!(request.header_str(header::ACCEPT), Some("application/json"));
        assert_eq!(request.body().as_ref(), b"{\"id\":3}");
    }

    #[test]
    fn test_parse_without_body() {
        let request = RequestInfo::parse("GET /api HTTP/1.1\r\nHost: a.test").unwrap();
        assert!(request.body().is_empty());
        assert_eq!(request.base_url(), "http://a.test");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RequestInfo::parse("").is_err());
        assert!(RequestInfo::parse("GET").is_err());
        assert!(RequestInfo::parse("GET /api HTTP/1.1\r\nbroken header\r\n\r\n").is_err());
    }

    #[tokio::test]
    async fn test_from_http_buffers_body_and_identity() {
        let mut request = http::Request::builder()
            .method(Method::POST)
            .uri("http://shop.test/api/product")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from_static(b"{\"name\":\"x\"}")))
            .unwrap();
        request
            .extensions_mut()
            .insert(ClaimIdentity::authenticated("alice", "Bearer"));

        let info = RequestInfo::from_http(request).await.unwrap();
        assert_eq!(info.method(), Method::POST);
        assert_eq!(info.body().as_ref(), b"{\"name\":\"x\"}");
        assert_eq!(info.identity().name(), Some("alice"));
    }
}
