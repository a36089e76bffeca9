//! URL templates.
//!
//! A template is a `/`-separated path whose segments may embed `{name}`
//! placeholders, optionally followed by a `{?a,b}` query expansion that is
//! only used for documentation. Templates compile into anchored,
//! case-insensitive [`RouteMatcher`]s.

use std::cmp::Ordering;
use std::fmt;

use crate::error::RouterError;
use crate::matcher::RouteMatcher;

/// One piece of a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Literal text, matched case-insensitively.
    Literal(String),
    /// A `{name}` placeholder matching one segment's worth of text.
    Variable(String),
}

/// One `/`-separated path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    parts: Vec<Part>,
}

impl Segment {
    /// Returns the parts of this segment.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns `true` if the segment has no placeholder.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, Part::Literal(_)))
    }

    fn parse(template: &str, raw: &str) -> Result<Self, RouterError> {
        let mut parts = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                parts.push(Part::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| RouterError::invalid(template, "unclosed '{'"))?;
            let name = &after[..close];
            if name.is_empty() {
                return Err(RouterError::invalid(template, "empty placeholder"));
            }
            if name.contains('{') {
                return Err(RouterError::invalid(template, "nested '{'"));
            }
            parts.push(Part::Variable(name.to_string()));
            rest = &after[close + 1..];
        }

        if rest.contains('}') {
            return Err(RouterError::invalid(template, "unmatched '}'"));
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }

        Ok(Self { parts })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                Part::Literal(text) => f.write_str(text)?,
                Part::Variable(name) => write!(f, "{{{name}}}")?,
            }
        }
        Ok(())
    }
}

/// How specific a template is. Greater is more specific.
///
/// More literal segments win; with equal literal segments, fewer
/// placeholders win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Specificity {
    /// Segments without any placeholder.
    pub literal_segments: usize,
    /// Total placeholders.
    pub placeholders: usize,
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_segments
            .cmp(&other.literal_segments)
            .then_with(|| other.placeholders.cmp(&self.placeholders))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parsed URL template.
///
/// # Example
///
/// ```rust
/// use hydrant_router::UrlTemplate;
///
/// let template = UrlTemplate::parse("/api/product/{id}{?fields}").unwrap();
///
/// assert_eq!(template.path(), "/api/product/{id}");
/// assert_eq!(template.fixed_path(), "/api/product");
/// assert_eq!(template.variables().collect::<Vec<_>>(), vec!["id"]);
/// assert_eq!(template.to_string(), "/api/product/{id}{?fields}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlTemplate {
    segments: Vec<Segment>,
    query: Vec<String>,
}

impl UrlTemplate {
    /// Parses a template.
    pub fn parse(template: &str) -> Result<Self, RouterError> {
        let (path, query) = match template.find("{?") {
            Some(start) => {
                let expansion = &template[start + 2..];
                let names = expansion
                    .strip_suffix('}')
                    .ok_or_else(|| RouterError::invalid(template, "query expansion must end the template"))?;
                let query = names
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(ToString::to_string)
                    .collect();
                (&template[..start], query)
            }
            None => (template, Vec::new()),
        };

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| Segment::parse(template, s))
            .collect::<Result<Vec<_>, _>>()?;

        let result = Self { segments, query };
        result.check_duplicates(template)?;
        Ok(result)
    }

    fn check_duplicates(&self, template: &str) -> Result<(), RouterError> {
        let names: Vec<&str> = self.variables().collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].iter().any(|n| n.eq_ignore_ascii_case(name)) {
                return Err(RouterError::invalid(
                    template,
                    format!("duplicate placeholder '{name}'"),
                ));
            }
        }
        Ok(())
    }

    /// Appends the segments (and query variables) of `suffix`.
    pub fn join(&self, suffix: &str) -> Result<Self, RouterError> {
        let suffix = Self::parse(suffix)?;
        let mut joined = self.clone();
        joined.segments.extend(suffix.segments);
        joined.query.extend(suffix.query);
        joined.check_duplicates(&joined.to_string())?;
        Ok(joined)
    }

    /// Appends a `/{name}` segment.
    pub fn push_variable(&mut self, name: &str) -> Result<(), RouterError> {
        self.segments.push(Segment {
            parts: vec![Part::Variable(name.to_string())],
        });
        self.check_duplicates(&self.to_string())
    }

    /// Adds a query variable to the documentation expansion.
    pub fn push_query(&mut self, name: impl Into<String>) {
        self.query.push(name.into());
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Path placeholders in template order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().flat_map(|s| {
            s.parts.iter().filter_map(|p| match p {
                Part::Variable(name) => Some(name.as_str()),
                Part::Literal(_) => None,
            })
        })
    }

    /// Query variables of the expansion.
    #[must_use]
    pub fn query_variables(&self) -> &[String] {
        &self.query
    }

    /// The path without the query expansion, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments.iter().fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&segment.to_string());
            acc
        })
    }

    /// The leading literal segments, e.g. `/api/product` for
    /// `/api/product/{id}`. Empty for templates starting with a placeholder.
    #[must_use]
    pub fn fixed_path(&self) -> String {
        self.segments
            .iter()
            .take_while(|s| s.is_literal())
            .fold(String::new(), |mut acc, segment| {
                acc.push('/');
                acc.push_str(&segment.to_string());
                acc
            })
    }

    /// Ranks this template against others matching the same path.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        Specificity {
            literal_segments: self.segments.iter().filter(|s| s.is_literal()).count(),
            placeholders: self.variables().count(),
        }
    }

    /// Substitutes placeholders. Unknown placeholders stay as `{name}`.
    #[must_use]
    pub fn expand(&self, values: &[(&str, &str)]) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            for part in &segment.parts {
                match part {
                    Part::Literal(text) => out.push_str(text),
                    Part::Variable(name) => {
                        match values.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                            Some((_, value)) => out.push_str(value),
                            None => {
                                out.push('{');
                                out.push_str(name);
                                out.push('}');
                            }
                        }
                    }
                }
            }
        }
        out
    }

    /// Compiles the template into an anchored, case-insensitive matcher.
    pub fn compile(&self) -> Result<RouteMatcher, RouterError> {
        let mut pattern = String::from("^");
        let mut variables = Vec::new();

        if self.segments.is_empty() {
            pattern.push('/');
        }
        for segment in &self.segments {
            pattern.push('/');
            for part in &segment.parts {
                match part {
                    Part::Literal(text) => pattern.push_str(&regex::escape(text)),
                    Part::Variable(name) => {
                        pattern.push_str(&format!("(?P<p{}>[^/]+)", variables.len()));
                        variables.push(name.clone());
                    }
                }
            }
        }
        pattern.push('$');

        RouteMatcher::new(pattern, variables)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;
        if !self.query.is_empty() {
            write!(f, "{{?{}}}", self.query.join(","))?;
        }
        Ok(())
    }
}
