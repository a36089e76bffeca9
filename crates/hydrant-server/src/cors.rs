//! Cross-origin resource sharing.
//!
//! Preflight requests (`OPTIONS` with `Origin` and
//! `Access-Control-Request-Method`) are answered by the dispatcher without
//! invoking any operation; the allowed methods are the verbs registered for
//! the requested path. Ordinary cross-origin requests get the
//! `Access-Control-Allow-Origin` and `Access-Control-Expose-Headers` headers.
//!
//! ## Example
//!
//! ```rust
//! use hydrant_server::CorsPolicy;
//! use std::time::Duration;
//!
//! let cors = CorsPolicy::new()
//!     .allow_origin("https://app.example.com")
//!     .allow_headers(["Content-Type", "Authorization"])
//!     .max_age(Duration::from_secs(600));
//!
//! assert!(cors.is_origin_allowed("https://app.example.com"));
//! assert!(!cors.is_origin_allowed("https://evil.example.com"));
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, VARY,
};
use http::{HeaderMap, HeaderValue, Method};

/// The set of allowed origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Any origin (`*`).
    Any,
    /// Only the listed origins.
    List(BTreeSet<String>),
}

impl AllowedOrigins {
    /// Checks if an origin is allowed.
    pub fn is_allowed(&self, origin: &str) -> bool {
        match self {
            AllowedOrigins::Any => true,
            AllowedOrigins::List(origins) => origins.contains(origin),
        }
    }

    /// Returns the `Access-Control-Allow-Origin` value for an origin.
    pub fn header_value(&self, origin: &str) -> Option<HeaderValue> {
        match self {
            AllowedOrigins::Any => Some(HeaderValue::from_static("*")),
            AllowedOrigins::List(origins) if origins.contains(origin) => {
                HeaderValue::from_str(origin).ok()
            }
            AllowedOrigins::List(_) => None,
        }
    }
}

/// CORS behaviour of a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allowed_origins: AllowedOrigins,
    allowed_headers: BTreeSet<String>,
    expose_headers: Vec<String>,
    max_age: Option<Duration>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: AllowedOrigins::Any,
            allowed_headers: BTreeSet::from([
                "accept".to_string(),
                "authorization".to_string(),
                "content-type".to_string(),
            ]),
            expose_headers: vec!["location".to_string(), "content-range".to_string()],
            max_age: Some(Duration::from_secs(86400)),
        }
    }
}

impl CorsPolicy {
    /// Creates the default policy: any origin, `Location` and
    /// `Content-Range` exposed, one day of preflight caching.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows any origin.
    #[must_use]
    pub fn allow_any_origin(mut self) -> Self {
        self.allowed_origins = AllowedOrigins::Any;
        self
    }

    /// Adds an allowed origin. The first call turns an "any origin" policy
    /// into an explicit list.
    #[must_use]
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        if origin == "*" {
            self.allowed_origins = AllowedOrigins::Any;
            return self;
        }
        if let AllowedOrigins::List(origins) = &mut self.allowed_origins {
            origins.insert(origin);
        } else {
            self.allowed_origins = AllowedOrigins::List(BTreeSet::from([origin]));
        }
        self
    }

    /// Replaces the allowed origins; `*` allows any.
    #[must_use]
    pub fn allow_origins<I, S>(self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = self;
        policy.allowed_origins = AllowedOrigins::List(BTreeSet::new());
        for origin in origins {
            policy = policy.allow_origin(origin);
        }
        policy
    }

    /// Sets the allowed request headers.
    #[must_use]
    pub fn allow_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_headers = headers.into_iter().map(|h| h.into().to_lowercase()).collect();
        self
    }

    /// Sets the max age for preflight caching.
    #[must_use]
    pub fn max_age(mut self, duration: Duration) -> Self {
        self.max_age = Some(duration);
        self
    }

    /// Disables preflight caching.
    #[must_use]
    pub fn no_max_age(mut self) -> Self {
        self.max_age = None;
        self
    }

    /// Checks if an origin is allowed.
    #[must_use]
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.is_allowed(origin)
    }

    /// Headers answering a preflight for a path accepting `methods`.
    ///
    /// Disallowed origins get no CORS headers at all.
    #[must_use]
    pub fn preflight_headers(&self, origin: &str, methods: &[Method]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Some(allow_origin) = self.allowed_origins.header_value(origin) else {
            return headers;
        };
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);

        let mut verbs: Vec<&str> = methods.iter().map(Method::as_str).collect();
        if !verbs.contains(&"OPTIONS") {
            verbs.push("OPTIONS");
        }
        if let Ok(value) = HeaderValue::from_str(&verbs.join(", ")) {
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, value);
        }

        if !self.allowed_headers.is_empty() {
            let allowed = self.allowed_headers.iter().cloned().collect::<Vec<_>>().join(", ");
            if let Ok(value) = HeaderValue::from_str(&allowed) {
                headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, value);
            }
        }
        if let Some(max_age) = self.max_age {
            headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(max_age.as_secs()));
        }
        self.vary(&mut headers);
        headers
    }

    /// Headers added to an ordinary cross-origin response.
    #[must_use]
    pub fn response_headers(&self, origin: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Some(allow_origin) = self.allowed_origins.header_value(origin) else {
            return headers;
        };
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        if !self.expose_headers.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&self.expose_headers.join(", ")) {
                headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, value);
            }
        }
        self.vary(&mut headers);
        headers
    }

    fn vary(&self, headers: &mut HeaderMap) {
        if matches!(self.allowed_origins, AllowedOrigins::List(_)) {
            headers.insert(VARY, HeaderValue::from_static("origin"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_any_origin() {
        let cors = CorsPolicy::new();
        let headers = cors.response_headers("https://a.example");

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_EXPOSE_HEADERS], "location, content-range");
        assert!(headers.get(VARY).is_none());
    }

    #[test]
    fn test_preflight_lists_route_methods() {
        let cors = CorsPolicy::new();
        let headers = cors.preflight_headers("https://a.example", &[Method::GET, Method::POST]);

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "86400");
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_HEADERS],
            "accept, authorization, content-type"
        );
    }

    #[test]
    fn test_explicit_origin_list() {
        let cors = CorsPolicy::new().allow_origins(["https://app.example"]);

        let headers = cors.response_headers("https://app.example");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example");
        assert_eq!(headers[VARY], "origin");

        assert!(cors.response_headers("https://other.example").is_empty());
        assert!(cors
            .preflight_headers("https://other.example", &[Method::GET])
            .is_empty());
    }

    #[test]
    fn test_wildcard_in_list_allows_any() {
        let cors = CorsPolicy::new().allow_origins(["https://app.example", "*"]);
        assert!(cors.is_origin_allowed("https://anything.example"));
    }

    #[test]
    fn test_no_max_age() {
        let cors = CorsPolicy::new().no_max_age();
        let headers = cors.preflight_headers("https://a.example", &[Method::GET]);
        assert!(headers.get(ACCESS_CONTROL_MAX_AGE).is_none());
    }
}
