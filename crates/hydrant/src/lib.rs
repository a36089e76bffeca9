//! # Hydrant
//!
//! **Registration-driven REST dispatch with Hydra hypermedia descriptions**
//!
//! Hydrant turns controller definitions into addressable HTTP operations:
//!
//! - **Descriptor building** - routes, verbs and argument sources derived
//!   from each method's declared shape
//! - **Content negotiation** - converters ranked against `Accept` and
//!   `Content-Type`, with a lenient `*/*` fallback
//! - **Hypermedia descriptions** - every controller publishes a Hydra
//!   `ApiDocumentation` graph, list results become paged collections
//! - **Host agnostic** - `http::Request` in, `http::Response` out; bring
//!   your own server loop
//!
//! ## Quick Start
//!
//! ```rust
//! use hydrant::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let dispatcher = HydrantBuilder::new(HydrantConfig::default())
//!     .controller(ControllerDefinition::new("Greeter", "/api/greeter").method(
//!         MethodInfo::new("get")
//!             .param(ParameterInfo::new::<String>("name").from_query())
//!             .returns::<String>(),
//!         |invocation| async move {
//!             let name: String = invocation.get("name")?;
//!             Outcome::of(&format!("Hello, {name}"))
//!         },
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let response = dispatcher
//!     .dispatch(RequestInfo::new(
//!         hydrant::http::Method::GET,
//!         hydrant::http::Uri::from_static("/api/greeter?name=ada"),
//!     ))
//!     .await;
//! assert_eq!(response.body_str(), Some("\"Hello, ada\""));
//! # });
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ControllerCatalog ─build─> DescriptorTable ─┬─> Dispatcher (per request)
//!                                             └─> HypermediaDescriptionBuilder
//!
//! Request → route → bind arguments → invoke → transform → negotiate → Response
//! ```

#![doc(html_root_url = "https://docs.rs/hydrant/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;

pub use app::{cors_policy, documentation_options, init_logging, HydrantBuilder};

pub use hydrant_config::{ConfigError, ConfigLoader, HydrantConfig};
pub use hydrant_core::{HydrantError, HydrantResult};
pub use hydrant_server::Dispatcher;

pub use http;

// Re-export core types
pub use hydrant_core as core;

// Re-export routing types
pub use hydrant_router as router;

// Re-export converters
pub use hydrant_convert as convert;

// Re-export argument binding
pub use hydrant_extract as extract;

// Re-export dispatch types
pub use hydrant_server as server;

// Re-export hypermedia descriptions
pub use hydrant_docs as docs;

// Re-export logging and metrics
pub use hydrant_telemetry as telemetry;

// Re-export configuration
pub use hydrant_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use hydrant::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{HydrantBuilder, HydrantConfig};

    pub use hydrant_core::{
        Capability, ClaimIdentity, FilterExpression, HydrantError, HydrantResult, ListQuery,
        MethodInfo, Page, ParameterInfo, ParameterRole, RequestInfo, ResponseInfo, ResultTarget,
        TypeShape,
    };

    pub use hydrant_convert::ConverterRegistry;

    pub use hydrant_server::{
        async_trait, ControllerCatalog, ControllerDefinition, CorsPolicy, Dispatcher, Invocation,
        Outcome, ReadController, ResponseTransformer, WriteController,
    };

    pub use hydrant_docs::{
        CollectionProjector, DescriptionFormat, Documentation, DocumentationOptions,
        HypermediaDescriptionBuilder, JsonLdConverter,
    };
}
