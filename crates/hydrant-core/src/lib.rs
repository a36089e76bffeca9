//! # Hydrant Core
//!
//! Core types shared by every Hydrant crate.
//!
//! - [`HydrantError`] - Standard error taxonomy and status mapping
//! - [`TypeShape`] / [`Shaped`] - Declared shapes of parameters and results
//! - [`MethodInfo`] / [`ParameterInfo`] - Explicit controller method metadata
//! - [`RequestInfo`] / [`ResponseInfo`] - Buffered request and response envelopes
//! - [`ClaimIdentity`] - Claim-based caller identity
//! - [`FilterExpression`] / [`ListQuery`] / [`Page`] - List operation conventions

#![doc(html_root_url = "https://docs.rs/hydrant-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod filter;
mod identity;
mod method;
mod paging;
mod request;
mod response;
mod shape;

pub use error::{ErrorCategory, HydrantError, HydrantResult};
pub use filter::{FilterClause, FilterExpression, FilterOperator, FILTER_VARIABLE};
pub use identity::{claim_types, Claim, ClaimIdentity};
pub use method::{
    ArgumentSource, Capability, MethodInfo, MethodOrigin, ParameterInfo, ParameterRole,
    ResultTarget,
};
pub use paging::{ListQuery, Page, SKIP_VARIABLE, TOP_VARIABLE};
pub use request::{RequestId, RequestInfo};
pub use response::{ResponseInfo, TEXT_PLAIN_UTF8};
pub use shape::{Shaped, TypeShape, EPOCH};
