//! URL templates and route tables for Hydrant.
//!
//! This crate turns `{name}`-style URL templates into anchored,
//! case-insensitive regex matchers and resolves requests against a table of
//! them, ranking candidates by specificity.
//!
//! # Features
//!
//! - **Templates**: `{name}` placeholders, mixed segments (`{name}.{ext}`),
//!   documentation-only query expansions (`{?a,b}`)
//! - **Compiled Matchers**: `^...$` regexes with an ordered capture map
//! - **Specificity**: literal segments beat placeholders, regardless of
//!   registration order
//! - **Verb Resolution**: distinguishes "no such path" from "path exists,
//!   verb does not"
//!
//! # Example
//!
//! ```rust
//! use hydrant_router::{Resolution, RouteTable, UrlTemplate};
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.insert(UrlTemplate::parse("/users").unwrap(), vec![Method::GET, Method::POST], 0).unwrap();
//! table.insert(UrlTemplate::parse("/users/{id}").unwrap(), vec![Method::GET], 1).unwrap();
//!
//! let Resolution::Matched(m) = table.resolve(&Method::GET, "/users/123") else {
//!     panic!("route should match");
//! };
//! assert_eq!(*m.value, 1);
//! assert_eq!(m.params.get("id"), Some("123"));
//! ```

mod error;
mod matcher;
mod params;
mod table;
mod template;

pub use error::RouterError;
pub use matcher::RouteMatcher;
pub use params::{percent_decode, Params};
pub use table::{Resolution, RouteEntry, RouteMatch, RouteTable};
pub use template::{Part, Segment, Specificity, UrlTemplate};
