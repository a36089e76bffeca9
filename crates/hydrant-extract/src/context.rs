//! Binding context providing access to request data.
//!
//! The [`BindingContext`] gives the binder one view of the URL captures, the
//! decoded query string, the headers and, for multipart requests, the body
//! parts of a request.

use hydrant_convert::BodyPart;
use hydrant_core::{ArgumentSource, RequestInfo};
use hydrant_router::Params;

use crate::error::BindingError;

/// Context providing access to all parts of a matched request.
///
/// The query string is decoded once, when the context is created. Lookups of
/// URL captures and query parameters ignore case.
///
/// # Example
///
/// ```rust
/// use hydrant_extract::BindingContext;
/// use hydrant_core::RequestInfo;
/// use hydrant_router::Params;
/// use http::{Method, Uri};
///
/// let request = RequestInfo::new(Method::GET, Uri::from_static("/products/7?$top=10"));
/// let mut params = Params::new();
/// params.push("id", "7");
///
/// let ctx = BindingContext::new(&request, params).unwrap();
///
/// assert_eq!(ctx.path_param("ID"), Some("7"));
/// assert_eq!(ctx.query_values("$top"), vec!["10"]);
/// ```
#[derive(Debug, Clone)]
pub struct BindingContext<'a> {
    request: &'a RequestInfo,
    path_params: Params,
    query: Vec<(String, String)>,
    parts: Option<Vec<BodyPart>>,
}

impl<'a> BindingContext<'a> {
    /// Creates a context, decoding the query string.
    ///
    /// # Errors
    ///
    /// Returns an error when the query string is not valid
    /// `application/x-www-form-urlencoded` text.
    pub fn new(request: &'a RequestInfo, path_params: Params) -> Result<Self, BindingError> {
        let query = match request.query() {
            Some(raw) if !raw.is_empty() => serde_urlencoded::from_str(raw).map_err(|e| {
                BindingError::invalid_value(ArgumentSource::QueryString, "query", e.to_string())
            })?,
            _ => Vec::new(),
        };
        Ok(Self {
            request,
            path_params,
            query,
            parts: None,
        })
    }

    /// Attaches the parts of a multipart body.
    #[must_use]
    pub fn with_parts(mut self, parts: Option<Vec<BodyPart>>) -> Self {
        self.parts = parts;
        self
    }

    /// Parts of a multipart body, `None` for any other body.
    #[must_use]
    pub fn parts(&self) -> Option<&[BodyPart]> {
        self.parts.as_deref()
    }

    /// Returns the request being bound.
    #[must_use]
    pub const fn request(&self) -> &'a RequestInfo {
        self.request
    }

    /// Returns the URL captures.
    #[must_use]
    pub const fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns one URL capture.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    /// Returns every value of a query parameter, in request order.
    #[must_use]
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, Method, Uri};

    #[test]
    fn test_repeated_query_values() {
        let request =
            RequestInfo::new(Method::GET, Uri::from_static("/things?tag=a&Tag=b&other=c"));
        let ctx = BindingContext::new(&request, Params::new()).unwrap();

        assert_eq!(ctx.query_values("tag"), vec!["a", "b"]);
        assert!(ctx.query_values("missing").is_empty());
    }

    #[test]
    fn test_query_is_percent_decoded() {
        let request = RequestInfo::new(
            Method::GET,
            Uri::from_static("/things?%24filter=name%20eq%20%27x%27"),
        );
        let ctx = BindingContext::new(&request, Params::new()).unwrap();

        assert_eq!(ctx.query_values("$filter"), vec!["name eq 'x'"]);
    }

    #[test]
    fn test_header_lookup() {
        let request = RequestInfo::new(Method::GET, Uri::from_static("/"))
            .with_header(
                http::header::HeaderName::from_static("x-tenant"),
                HeaderValue::from_static("acme"),
            );
        let ctx = BindingContext::new(&request, Params::new()).unwrap();

        assert_eq!(ctx.header("X-Tenant"), Some("acme"));
        assert_eq!(ctx.header("x-missing"), None);
    }
}
