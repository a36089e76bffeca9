//! Specificity-ranked route tables.
//!
//! A [`RouteTable`] holds compiled matchers in registration order. Resolving
//! a request considers every entry whose matcher accepts the path, keeps the
//! ones registered for the verb and picks the most specific; ties go to the
//! entry registered first.

use http::Method;

use crate::error::RouterError;
use crate::matcher::RouteMatcher;
use crate::params::Params;
use crate::template::{Specificity, UrlTemplate};

/// One registered route.
#[derive(Debug, Clone)]
pub struct RouteEntry<T> {
    template: UrlTemplate,
    matcher: RouteMatcher,
    specificity: Specificity,
    verbs: Vec<Method>,
    value: T,
}

impl<T> RouteEntry<T> {
    /// The source template.
    #[must_use]
    pub const fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// The compiled matcher.
    #[must_use]
    pub const fn matcher(&self) -> &RouteMatcher {
        &self.matcher
    }

    /// Verbs the route answers to.
    #[must_use]
    pub fn verbs(&self) -> &[Method] {
        &self.verbs
    }

    /// The stored value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }
}

/// A matched route with its value and extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the route.
    pub value: &'a T,
    /// Extracted URL variables.
    pub params: Params,
}

/// Outcome of resolving a request against a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a, T> {
    /// A route accepts both path and verb.
    Matched(RouteMatch<'a, T>),
    /// Some route accepts the path, none the verb.
    MethodNotAllowed(Vec<Method>),
    /// No route accepts the path.
    NotFound,
}

/// Routes in registration order.
///
/// # Example
///
/// ```rust
/// use hydrant_router::{Resolution, RouteTable, UrlTemplate};
/// use http::Method;
///
/// let mut table = RouteTable::new();
/// table.insert(UrlTemplate::parse("/api/product/{id}").unwrap(), vec![Method::GET], "get").unwrap();
/// table.insert(UrlTemplate::parse("/api/product/featured").unwrap(), vec![Method::GET], "featured").unwrap();
///
/// match table.resolve(&Method::GET, "/api/product/featured") {
///     Resolution::Matched(m) => assert_eq!(*m.value, "featured"),
///     other => panic!("unexpected {other:?}"),
/// }
///
/// assert_eq!(
///     table.resolve(&Method::DELETE, "/api/product/7"),
///     Resolution::MethodNotAllowed(vec![Method::GET]),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<T> {
    entries: Vec<RouteEntry<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Compiles and appends a route.
    pub fn insert(
        &mut self,
        template: UrlTemplate,
        verbs: Vec<Method>,
        value: T,
    ) -> Result<(), RouterError> {
        let matcher = template.compile()?;
        let specificity = template.specificity();
        self.entries.push(RouteEntry {
            template,
            matcher,
            specificity,
            verbs,
            value,
        });
        Ok(())
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry<T>> {
        self.entries.iter()
    }

    /// Resolves a verb and path.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_, T> {
        let mut best: Option<(&RouteEntry<T>, Params)> = None;
        let mut allowed: Vec<Method> = Vec::new();

        for entry in &self.entries {
            let Some(params) = entry.matcher.captures(path) else {
                continue;
            };
            for verb in &entry.verbs {
                if !allowed.contains(verb) {
                    allowed.push(verb.clone());
                }
            }
            if !entry.verbs.contains(method) {
                continue;
            }
            let better = best
                .as_ref()
                .map_or(true, |(current, _)| entry.specificity > current.specificity);
            if better {
                best = Some((entry, params));
            }
        }

        match best {
            Some((entry, params)) => Resolution::Matched(RouteMatch {
                value: &entry.value,
                params,
            }),
            None if allowed.is_empty() => Resolution::NotFound,
            None => Resolution::MethodNotAllowed(allowed),
        }
    }

    /// Verbs accepted on a path, in registration order.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.matcher.is_match(path)) {
            for verb in &entry.verbs {
                if !allowed.contains(verb) {
                    allowed.push(verb.clone());
                }
            }
        }
        allowed
    }
}
