//! # Hydrant Docs
//!
//! Hypermedia self-description for Hydrant APIs.
//!
//! This crate provides:
//! - **Hydra API documentation** built from operation descriptors
//! - **Description controllers** answering `GET {base}/documentation` and
//!   `OPTIONS {base}` for every registered controller
//! - **Collection projection** of list results into `hydra:Collection`
//!   documents with paging views
//! - **JSON-LD** body conversion
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hydrant_convert::ConverterRegistry;
//! use hydrant_docs::{CollectionProjector, Documentation, DocumentationOptions, JsonLdConverter};
//! use hydrant_server::Dispatcher;
//!
//! Documentation::attach(&mut catalog, &DocumentationOptions::new().title("Shop"))?;
//! let dispatcher = Dispatcher::new(
//!     catalog.build()?,
//!     ConverterRegistry::with_defaults().with(JsonLdConverter),
//! )
//! .with_transformer(CollectionProjector);
//! ```
//!
//! ## Documents
//!
//! Every document is a JSON-LD object with a shared `@context` and an
//! `@graph` of nodes. The first node is the `hydra:ApiDocumentation` whose
//! `@id` is the base IRI; classes are identified as `{base}#{Class}` and
//! operations as `{base}{path}#{VERB}{Arg}And{Arg}`.

#![doc(html_root_url = "https://docs.rs/hydrant-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod description;
mod error;
mod graph;
mod jsonld;
mod projection;
pub mod vocab;

#[cfg(test)]
mod testing;

pub use builder::{operation_iri, status_codes, HypermediaDescriptionBuilder};
pub use description::{
    fallback_extension, DescriptionFormat, Documentation, DocumentationOptions,
    DEFAULT_DOCUMENTATION_SEGMENT,
};
pub use error::{DocsError, DocsResult};
pub use graph::{
    ApiDocumentation, ClassNode, CollectionNode, HypermediaGraph, HypermediaNode, OperationNode,
    PartialCollectionView,
};
pub use jsonld::{JsonLdConverter, APPLICATION_LD_JSON};
pub use projection::{CollectionPage, CollectionProjector};
