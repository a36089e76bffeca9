//! Test request building.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::Full;
use hydrant_core::ClaimIdentity;
use serde::Serialize;

use crate::error::TestError;

/// A test request that can be sent to a [`TestClient`](crate::TestClient).
#[derive(Debug)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Bytes,
    /// Caller identity attached as a request extension
    pub identity: Option<ClaimIdentity>,
}

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Creates a new OPTIONS request.
    pub fn options(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::OPTIONS, uri)
    }

    /// Converts this request to an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::RequestBuild`] if the parts do not form a valid
    /// request.
    pub fn into_http_request(self) -> Result<http::Request<Full<Bytes>>, TestError> {
        let mut builder = http::Request::builder().method(self.method).uri(self.uri);

        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        if let Some(identity) = self.identity {
            builder = builder.extension(identity);
        }

        builder
            .body(Full::new(self.body))
            .map_err(|e| TestError::request_build(e.to_string()))
    }
}

/// Builder for constructing test requests.
///
/// Header and body errors are kept until [`build`](Self::build) so calls can
/// be chained without intermediate results.
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    identity: Option<ClaimIdentity>,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
            identity: None,
            error: None,
        }
    }

    /// Sets a header on the request.
    ///
    /// # Example
    ///
    /// ```
    /// use hydrant_test::TestRequest;
    ///
    /// let request = TestRequest::get("/api/product")
    ///     .header("Authorization", "Bearer token")
    ///     .header("X-Request-ID", "12345")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(request.headers["x-request-id"], "12345");
    /// ```
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let name = match HeaderName::try_from(name.as_ref()) {
            Ok(name) => name,
            Err(e) => {
                self.error = Some(TestError::invalid_header(format!("{}: {e}", name.as_ref())));
                return self;
            }
        };
        match HeaderValue::try_from(value.as_ref()) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(e) => self.error = Some(TestError::invalid_header(format!("{name}: {e}"))),
        }
        self
    }

    /// Sets a typed header on the request.
    pub fn header_typed(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Accept header.
    pub fn accept(self, accept: impl AsRef<str>) -> Self {
        self.header(header::ACCEPT.as_str(), accept)
    }

    /// Sets the Origin header.
    pub fn origin(self, origin: impl AsRef<str>) -> Self {
        self.header(header::ORIGIN.as_str(), origin)
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(header::AUTHORIZATION.as_str(), format!("Bearer {}", token.as_ref()))
    }

    /// Sets the caller identity seen by operations.
    pub fn identity(mut self, identity: ClaimIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request body as JSON.
    ///
    /// This also sets the `Content-Type` header to `application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Some(Bytes::from(bytes)),
            Err(e) => {
                self.error.get_or_insert(TestError::Json(e));
            }
        }
        self.content_type("application/json")
    }

    /// Sets the request body as form-urlencoded.
    ///
    /// This also sets the `Content-Type` header to `application/x-www-form-urlencoded`.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => self.body = Some(Bytes::from(encoded)),
            Err(e) => {
                self.error.get_or_insert(TestError::Form(e));
            }
        }
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Builds the test request.
    ///
    /// # Errors
    ///
    /// Returns the first header or body error recorded while building, or
    /// [`TestError::RequestBuild`] if the URI is invalid.
    pub fn build(self) -> Result<TestRequest, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::request_build(format!("Invalid URI: {e}")))?;

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body.unwrap_or_default(),
            identity: self.identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request() {
        let request = TestRequest::get("/api/product?$top=5").build().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri.path(), "/api/product");
        assert_eq!(request.uri.query(), Some("$top=5"));
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = TestRequest::post("/api/product")
            .json(&json!({"name": "Lamp"}))
            .build()
            .unwrap();

        assert_eq!(request.headers[header::CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["name"], "Lamp");
    }

    #[test]
    fn test_form_body() {
        let request = TestRequest::post("/api/product")
            .form(&[("name", "Desk lamp"), ("price", "9.5")])
            .build()
            .unwrap();

        assert_eq!(
            request.headers[header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(&request.body[..], b"name=Desk+lamp&price=9.5");
    }

    #[test]
    fn test_accept_and_origin() {
        let request = TestRequest::get("/api/product")
            .accept("application/ld+json")
            .origin("https://app.shop.test")
            .build()
            .unwrap();

        assert_eq!(request.headers[header::ACCEPT], "application/ld+json");
        assert_eq!(request.headers[header::ORIGIN], "https://app.shop.test");
    }

    #[test]
    fn test_invalid_header_is_reported_by_build() {
        let err = TestRequest::get("/api/product")
            .header("bad header", "value")
            .accept("application/json")
            .build()
            .unwrap_err();

        assert!(matches!(err, TestError::InvalidHeader(_)));
    }

    #[test]
    fn test_invalid_uri() {
        let err = TestRequest::get("not a uri").build().unwrap_err();
        assert!(matches!(err, TestError::RequestBuild(_)));
    }

    #[test]
    fn test_identity_travels_as_extension() {
        let request = TestRequest::get("/api/me")
            .identity(ClaimIdentity::authenticated("ada", "Bearer"))
            .build()
            .unwrap()
            .into_http_request()
            .unwrap();

        let identity = request.extensions().get::<ClaimIdentity>().unwrap();
        assert_eq!(identity.name(), Some("ada"));
    }
}
