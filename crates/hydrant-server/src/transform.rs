//! Result post-processing hooks.

use std::sync::Arc;

use hydrant_core::{HydrantResult, RequestInfo};
use hydrant_extract::Arguments;

use crate::descriptor::OperationDescriptor;
use crate::outcome::Outcome;

/// Rewrites a controller's outcome before it is written.
///
/// Transformers run in registration order after the controller returned and
/// before result mapping, e.g. to wrap list results into hypermedia
/// collections when the client asked for a graph format.
pub trait ResponseTransformer: Send + Sync {
    /// Returns the (possibly rewritten) outcome.
    fn transform(
        &self,
        descriptor: &OperationDescriptor,
        request: &RequestInfo,
        arguments: &Arguments,
        outcome: Outcome,
    ) -> HydrantResult<Outcome>;
}

impl<T: ResponseTransformer + ?Sized> ResponseTransformer for Arc<T> {
    fn transform(
        &self,
        descriptor: &OperationDescriptor,
        request: &RequestInfo,
        arguments: &Arguments,
        outcome: Outcome,
    ) -> HydrantResult<Outcome> {
        (**self).transform(descriptor, request, arguments, outcome)
    }
}
