//! Argument source and result target resolution.
//!
//! Explicit annotations on [`ParameterInfo`] / [`MethodInfo`] always win.
//! Without them, [`DefaultSourceResolver`] applies these heuristics:
//!
//! | Parameter | Source |
//! |---|---|
//! | `Uuid`, `Timestamp` | URL |
//! | integer or tagged identity named `id`, `identifier`, `identity`, `key` | URL |
//! | caller identity | neutral |
//! | objects, graphs, non-numeric sequences | body |
//! | anything else | query string |
//!
//! | Result | Target |
//! |---|---|
//! | `Uuid` / `Timestamp` return, or the key returned by a create member | `Location` |
//! | first out value of a list member | `Content-Range` |
//! | anything else | body |
//!
//! Header targets survive only on controllers declaring a create, update or
//! list capability; elsewhere they degrade to the body.

use http::header::{CONTENT_RANGE, LOCATION};
use http::Method;
use hydrant_core::{
    ArgumentSource, Capability, MethodInfo, ParameterInfo, ResultTarget, TypeShape,
};

use crate::binding::{ArgumentBinding, OutputBinding, ResultBinding};

/// Parameter names treated as identifiers (case-insensitive).
pub const IDENTIFIER_NAMES: [&str; 4] = ["id", "identifier", "identity", "key"];

/// Which result value is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSlot {
    /// The method's return value.
    Primary,
    /// The n-th out parameter.
    Output(usize),
}

/// Decides where arguments come from and where results go.
///
/// Implementations must be pure: the same inputs always give the same
/// answer, so descriptor building stays deterministic.
pub trait ArgumentSourceResolver: Send + Sync {
    /// Resolves the source of one parameter for the given verb.
    fn resolve_source(&self, parameter: &ParameterInfo, verb: &Method) -> ArgumentSource;

    /// Resolves the target of one result slot.
    fn resolve_target(
        &self,
        slot: ResultSlot,
        method: &MethodInfo,
        capabilities: &[Capability],
    ) -> ResultTarget;
}

/// The conventional resolver.
///
/// # Example
///
/// ```rust
/// use hydrant_extract::{ArgumentSourceResolver, DefaultSourceResolver};
/// use hydrant_core::{ArgumentSource, ParameterInfo};
/// use http::Method;
///
/// let resolver = DefaultSourceResolver;
///
/// let id = ParameterInfo::new::<i64>("id");
/// let count = ParameterInfo::new::<i64>("count");
///
/// assert_eq!(resolver.resolve_source(&id, &Method::GET), ArgumentSource::Url);
/// assert_eq!(resolver.resolve_source(&count, &Method::GET), ArgumentSource::QueryString);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSourceResolver;

/// Returns `true` for `id`, `identifier`, `identity` and `key`, ignoring case
/// and a leading `$`.
#[must_use]
pub fn is_identifier_name(name: &str) -> bool {
    let name = name.trim_start_matches('$');
    IDENTIFIER_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}

fn keeps_header(capabilities: &[Capability]) -> bool {
    capabilities
        .iter()
        .any(|c| matches!(c, Capability::Create | Capability::Update | Capability::List))
}

impl ArgumentSourceResolver for DefaultSourceResolver {
    fn resolve_source(&self, parameter: &ParameterInfo, _verb: &Method) -> ArgumentSource {
        if let Some(source) = parameter.explicit_source() {
            return source;
        }

        let shape = parameter.shape();
        if *shape == TypeShape::Principal {
            ArgumentSource::Neutral
        } else if shape.is_intrinsic_identifier()
            || (shape.is_identity_capable() && is_identifier_name(parameter.name()))
        {
            ArgumentSource::Url
        } else if shape.is_body_shape() {
            ArgumentSource::Body
        } else {
            ArgumentSource::QueryString
        }
    }

    fn resolve_target(
        &self,
        slot: ResultSlot,
        method: &MethodInfo,
        capabilities: &[Capability],
    ) -> ResultTarget {
        let capability = method.origin().capability();
        let default = match slot {
            ResultSlot::Primary => {
                if let Some(target) = method.result_override() {
                    return target.clone();
                }
                let shape = method.return_shape();
                let is_key = shape.is_intrinsic_identifier()
                    || (capability == Some(Capability::Create) && shape.is_identity_capable());
                if is_key {
                    ResultTarget::Header(LOCATION)
                } else {
                    ResultTarget::Body
                }
            }
            ResultSlot::Output(0) if capability == Some(Capability::List) => {
                ResultTarget::Header(CONTENT_RANGE)
            }
            ResultSlot::Output(_) => ResultTarget::Body,
        };

        match default {
            ResultTarget::Header(_) if !keeps_header(capabilities) => ResultTarget::Body,
            other => other,
        }
    }
}

/// Resolves every argument and result binding of a method.
pub fn resolve_bindings(
    resolver: &dyn ArgumentSourceResolver,
    method: &MethodInfo,
    verb: &Method,
    capabilities: &[Capability],
) -> (Vec<ArgumentBinding>, ResultBinding) {
    let arguments = method
        .inputs()
        .map(|p| ArgumentBinding::new(p.clone(), resolver.resolve_source(p, verb)))
        .collect();

    let outputs = method
        .outputs()
        .enumerate()
        .map(|(i, p)| {
            OutputBinding::new(
                p.clone(),
                resolver.resolve_target(ResultSlot::Output(i), method, capabilities),
            )
        })
        .collect();

    let result = ResultBinding::new(
        method.return_shape().clone(),
        resolver.resolve_target(ResultSlot::Primary, method, capabilities),
        outputs,
    );

    (arguments, result)
}
