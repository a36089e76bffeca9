//! Compiled URL matchers.

use regex::{Regex, RegexBuilder};

use crate::error::RouterError;
use crate::params::{percent_decode, Params};

/// An anchored, case-insensitive regex plus its ordered capture map.
///
/// Capture groups are named `p0`, `p1`, ... because variable names such as
/// `$skip` are not valid group names; [`variables`](Self::variables) maps
/// each index back to the template variable.
///
/// # Example
///
/// ```rust
/// use hydrant_router::UrlTemplate;
///
/// let matcher = UrlTemplate::parse("/api/product/{id}").unwrap().compile().unwrap();
/// let params = matcher.captures("/API/Product/42/").unwrap();
///
/// assert_eq!(params.get("id"), Some("42"));
/// assert!(matcher.captures("/api/product").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    regex: Regex,
    variables: Vec<String>,
}

impl RouteMatcher {
    pub(crate) fn new(pattern: String, variables: Vec<String>) -> Result<Self, RouterError> {
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self { regex, variables })
    }

    /// The regex source, e.g. `^/api/test$`.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Template variables in capture order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns `true` if the path matches.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(normalize(path))
    }

    /// Matches a path and returns the decoded variables.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(normalize(path))?;
        let mut params = Params::new();
        for (index, name) in self.variables.iter().enumerate() {
            if let Some(value) = captures.name(&format!("p{index}")) {
                params.push(name.clone(), percent_decode(value.as_str()));
            }
        }
        Some(params)
    }
}

impl PartialEq for RouteMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern().eq_ignore_ascii_case(other.pattern())
    }
}

impl Eq for RouteMatcher {}

/// Strips trailing slashes; the empty path becomes `/`.
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
