//! # Hydrant Server
//!
//! Controller registration, operation descriptors and request dispatch.
//!
//! - [`ControllerDefinition`]: a controller's name, base route, capabilities
//!   and method handlers. [`ReadController`] and [`WriteController`] add the
//!   conventional list/get/create/update/delete members.
//! - [`ControllerCatalog`]: builds the [`DescriptorTable`] of every
//!   registered controller, rejecting ambiguous routes up front.
//! - [`Dispatcher`]: selects the operation for a request, binds its
//!   arguments, runs the handler and maps the result onto the response.
//! - [`CorsPolicy`]: preflight answers and cross-origin response headers.
//!
//! ## Example
//!
//! ```rust
//! use hydrant_convert::ConverterRegistry;
//! use hydrant_core::{MethodInfo, ParameterInfo, RequestInfo};
//! use hydrant_server::{ControllerCatalog, ControllerDefinition, Dispatcher, Outcome};
//! use http::{Method, StatusCode, Uri};
//!
//! # tokio_test::block_on(async {
//! let greeter = ControllerDefinition::new("Greeter", "/api/greeter").method(
//!     MethodInfo::new("hello")
//!         .param(ParameterInfo::new::<String>("name"))
//!         .returns::<String>(),
//!     |invocation| async move {
//!         let name: String = invocation.get("name")?;
//!         Outcome::of(&format!("Hello, {name}!"))
//!     },
//! );
//!
//! let table = ControllerCatalog::new().with(greeter).build().unwrap();
//! let dispatcher = Dispatcher::new(table, ConverterRegistry::with_defaults());
//!
//! let request = RequestInfo::new(Method::GET, Uri::from_static("/api/greeter/hello?name=Ada"));
//! let response = dispatcher.dispatch(request).await;
//!
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body_str(), Some("\"Hello, Ada!\""));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/hydrant-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod catalog;
mod controller;
mod cors;
mod descriptor;
mod dispatcher;
mod outcome;
mod resource;
mod transform;

#[cfg(test)]
mod testing;

pub use builder::{conventional_verbs, method_segment, verb_for_word, OperationDescriptorBuilder};
pub use catalog::{ControllerCatalog, ControllerInfo, DescriptorTable};
pub use controller::{
    BoxedHandlerResult, ControllerDefinition, Handler, Invocation, MethodRegistration,
};
pub use cors::{AllowedOrigins, CorsPolicy};
pub use descriptor::{OperationDescriptor, OperationKind};
pub use dispatcher::Dispatcher;
pub use outcome::Outcome;
pub use resource::{list_method, ReadController, WriteController, KEY_ARGUMENT};
pub use transform::ResponseTransformer;

#[doc(no_inline)]
pub use async_trait::async_trait;
