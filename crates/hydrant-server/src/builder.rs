//! Operation descriptor construction.
//!
//! The [`OperationDescriptorBuilder`] turns one [`ControllerDefinition`] into
//! its descriptors. Building is deterministic: the same definition always
//! yields the same descriptors in the same order.
//!
//! # Conventions
//!
//! - **Template**: controller base route, then the method segment, then one
//!   `/{variable}` per URL-bound argument in declaration order. The method
//!   segment is the explicit route when there is one, empty for capability
//!   members, otherwise the kebab-cased method name without a leading verb
//!   word (`find_by_name` becomes `/by-name`).
//! - **Verb**: explicit verbs win; capability members use their capability's
//!   verb; otherwise the leading word of the name decides (`get`, `list`,
//!   `find`, `query` → GET; `create`, `add`, `post` → POST; `update`,
//!   `replace`, `set`, `put` → PUT; `delete`, `remove` → DELETE), GET by
//!   default.

use std::sync::Arc;

use heck::ToKebabCase;
use http::Method;
use hydrant_core::{ArgumentSource, HydrantError, HydrantResult, MethodInfo};
use hydrant_extract::{resolve_bindings, ArgumentSourceResolver, DefaultSourceResolver};
use hydrant_router::UrlTemplate;
use tracing::debug;

use crate::controller::ControllerDefinition;
use crate::descriptor::{OperationDescriptor, OperationKind};

const GET_WORDS: [&str; 4] = ["get", "list", "find", "query"];
const POST_WORDS: [&str; 3] = ["create", "add", "post"];
const PUT_WORDS: [&str; 4] = ["update", "replace", "set", "put"];
const DELETE_WORDS: [&str; 2] = ["delete", "remove"];

/// Returns the verb a leading name word stands for.
#[must_use]
pub fn verb_for_word(word: &str) -> Option<Method> {
    let word = word.to_ascii_lowercase();
    let word = word.as_str();
    if GET_WORDS.contains(&word) {
        Some(Method::GET)
    } else if POST_WORDS.contains(&word) {
        Some(Method::POST)
    } else if PUT_WORDS.contains(&word) {
        Some(Method::PUT)
    } else if DELETE_WORDS.contains(&word) {
        Some(Method::DELETE)
    } else {
        None
    }
}

fn name_words(name: &str) -> Vec<String> {
    name.to_kebab_case()
        .split('-')
        .filter(|w| !w.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// The verbs a method answers to.
#[must_use]
pub fn conventional_verbs(method: &MethodInfo) -> Vec<Method> {
    if !method.verbs().is_empty() {
        return method.verbs().to_vec();
    }
    if let Some(capability) = method.origin().capability() {
        return vec![capability.default_verb()];
    }
    let verb = name_words(method.name())
        .first()
        .and_then(|w| verb_for_word(w))
        .unwrap_or(Method::GET);
    vec![verb]
}

/// The route segment a method adds to its controller's base route.
#[must_use]
pub fn method_segment(method: &MethodInfo) -> String {
    if let Some(route) = method.explicit_route() {
        return route.to_string();
    }
    if method.origin().capability().is_some() {
        return String::new();
    }
    let mut words = name_words(method.name());
    if words.first().is_some_and(|w| verb_for_word(w).is_some()) {
        words.remove(0);
    }
    if words.is_empty() {
        String::new()
    } else {
        format!("/{}", words.join("-"))
    }
}

/// Builds operation descriptors from controller definitions.
#[derive(Clone)]
pub struct OperationDescriptorBuilder {
    resolver: Arc<dyn ArgumentSourceResolver>,
}

impl Default for OperationDescriptorBuilder {
    fn default() -> Self {
        Self::new(Arc::new(DefaultSourceResolver))
    }
}

impl std::fmt::Debug for OperationDescriptorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDescriptorBuilder").finish_non_exhaustive()
    }
}

impl OperationDescriptorBuilder {
    /// Creates a builder using `resolver` for argument sources.
    #[must_use]
    pub fn new(resolver: Arc<dyn ArgumentSourceResolver>) -> Self {
        Self { resolver }
    }

    /// Builds one descriptor per registered method.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid templates and methods
    /// colliding on verb and route.
    pub fn build(&self, definition: &ControllerDefinition) -> HydrantResult<Vec<OperationDescriptor>> {
        let controller = definition.name();
        let config_error = |e: &dyn std::fmt::Display| HydrantError::configuration(controller, e.to_string());

        let base = UrlTemplate::parse(definition.base_route()).map_err(|e| config_error(&e))?;
        let mut descriptors: Vec<OperationDescriptor> = Vec::with_capacity(definition.methods().len());

        for registration in definition.methods() {
            let info = registration.info();
            let verbs = conventional_verbs(info);
            let primary = verbs.first().cloned().unwrap_or(Method::GET);

            let (arguments, result) =
                resolve_bindings(self.resolver.as_ref(), info, &primary, definition.capabilities());

            let segment = method_segment(info);
            let mut template = if segment.is_empty() {
                base.clone()
            } else {
                base.join(&segment).map_err(|e| config_error(&e))?
            };
            for argument in &arguments {
                match argument.source() {
                    ArgumentSource::Url => {
                        let variable = argument.variable();
                        if template.variables().any(|v| v.eq_ignore_ascii_case(variable)) {
                            continue;
                        }
                        template = match argument.parameter().url_fragment() {
                            Some(fragment) => template.join(fragment).map_err(|e| config_error(&e))?,
                            None => {
                                template.push_variable(variable).map_err(|e| config_error(&e))?;
                                template
                            }
                        };
                    }
                    ArgumentSource::QueryString => template.push_query(argument.variable()),
                    _ => {}
                }
            }
            let matcher = template.compile().map_err(|e| config_error(&e))?;

            let capability = info
                .origin()
                .capability()
                .filter(|c| definition.capabilities().contains(c));
            let kind = OperationKind::for_capability(capability);

            if let Some(existing) = descriptors
                .iter()
                .find(|d| d.matcher == matcher && d.verbs.iter().any(|v| verbs.contains(v)))
            {
                return Err(HydrantError::configuration(
                    controller,
                    format!(
                        "methods '{}' and '{}' both answer {} {}",
                        existing.method,
                        info.name(),
                        primary,
                        template.path()
                    ),
                ));
            }

            debug!(
                controller = controller,
                method = info.name(),
                verb = %primary,
                template = %template,
                kind = ?kind,
                "built operation descriptor"
            );

            descriptors.push(OperationDescriptor {
                controller: controller.to_string(),
                method: info.name().to_string(),
                verbs,
                template,
                matcher,
                arguments,
                result,
                kind,
                capability,
                handler: Arc::clone(registration.handler()),
            });
        }

        Ok(descriptors)
    }
}
