//! # Hydrant Extract
//!
//! Argument source resolution and request binding for Hydrant.
//!
//! Every controller parameter is bound from exactly one part of the request.
//! The [`ArgumentSourceResolver`] decides which part, once, when operations
//! are built; the [`bind`] function reads the values on every request.
//!
//! ## Sources
//!
//! | Source | Request part | Parsing |
//! |--------|--------------|---------|
//! | [`ArgumentSource::Url`] | URL template capture | scalar text |
//! | [`ArgumentSource::QueryString`] | query parameter | scalar text, repeated keys form sequences |
//! | [`ArgumentSource::Header`] | request header | scalar text |
//! | [`ArgumentSource::Body`] | message body | negotiated converter |
//! | [`ArgumentSource::Neutral`] | framework | caller identity |
//!
//! ## Example
//!
//! ```rust
//! use hydrant_extract::{bind, resolve_bindings, BindingContext, DefaultSourceResolver};
//! use hydrant_convert::ConverterRegistry;
//! use hydrant_core::{MethodInfo, ParameterInfo, RequestInfo};
//! use hydrant_router::Params;
//! use http::{Method, Uri};
//!
//! let method = MethodInfo::new("get")
//!     .param(ParameterInfo::new::<i64>("id"))
//!     .param(ParameterInfo::new::<Option<bool>>("verbose"));
//! let (bindings, _) = resolve_bindings(&DefaultSourceResolver, &method, &Method::GET, &[]);
//!
//! let request = RequestInfo::new(Method::GET, Uri::from_static("/items/3?verbose=true"));
//! let mut params = Params::new();
//! params.push("id", "3");
//!
//! let ctx = BindingContext::new(&request, params).unwrap();
//! let args = bind(&bindings, &ctx, &ConverterRegistry::with_defaults()).unwrap();
//!
//! assert_eq!(args.get::<i64>("id").unwrap(), 3);
//! assert_eq!(args.get::<Option<bool>>("verbose").unwrap(), Some(true));
//! ```
//!
//! ## Error Handling
//!
//! Binding failures are reported as [`BindingError`], which converts into a
//! `400 Bad Request` [`hydrant_core::HydrantError`].

mod arguments;
mod binder;
mod binding;
mod context;
mod error;
mod resolver;

pub use arguments::Arguments;
pub use binder::bind;
pub use binding::{ArgumentBinding, OutputBinding, ResultBinding};
pub use context::BindingContext;
pub use error::BindingError;
pub use resolver::{
    is_identifier_name, resolve_bindings, ArgumentSourceResolver, DefaultSourceResolver,
    ResultSlot, IDENTIFIER_NAMES,
};

#[doc(no_inline)]
pub use hydrant_core::ArgumentSource;
