//! Operation descriptors.

use std::fmt;

use http::Method;
use hydrant_core::{Capability, ParameterRole};
use hydrant_extract::{ArgumentBinding, ResultBinding};
use hydrant_router::{RouteMatcher, UrlTemplate};

use crate::controller::Handler;

/// How an operation changes the resource it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Anything that is not a capability write member.
    Generic,
    /// Adds a resource.
    Create,
    /// Replaces a resource.
    Update,
    /// Removes a resource.
    Delete,
}

impl OperationKind {
    /// Classifies a method registered for `capability`.
    #[must_use]
    pub const fn for_capability(capability: Option<Capability>) -> Self {
        match capability {
            Some(Capability::Create) => Self::Create,
            Some(Capability::Update) => Self::Update,
            Some(Capability::Delete) => Self::Delete,
            _ => Self::Generic,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generic => "Operation",
            Self::Create => "CreateResourceOperation",
            Self::Update => "ReplaceResourceOperation",
            Self::Delete => "DeleteResourceOperation",
        };
        f.write_str(name)
    }
}

/// One addressable operation: a controller method bound to verbs and a
/// URL template.
///
/// Identity is the pair (controller name, method name). Descriptors are
/// built once by the [`OperationDescriptorBuilder`](crate::OperationDescriptorBuilder)
/// and never change afterwards.
#[derive(Clone)]
pub struct OperationDescriptor {
    pub(crate) controller: String,
    pub(crate) method: String,
    pub(crate) verbs: Vec<Method>,
    pub(crate) template: UrlTemplate,
    pub(crate) matcher: RouteMatcher,
    pub(crate) arguments: Vec<ArgumentBinding>,
    pub(crate) result: ResultBinding,
    pub(crate) kind: OperationKind,
    pub(crate) capability: Option<Capability>,
    pub(crate) handler: Handler,
}

impl OperationDescriptor {
    /// Owning controller.
    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Accepted verbs; the first is the protocol-specific command.
    #[must_use]
    pub fn verbs(&self) -> &[Method] {
        &self.verbs
    }

    /// The primary verb.
    #[must_use]
    pub fn verb(&self) -> &Method {
        self.verbs.first().unwrap_or(&Method::GET)
    }

    /// URL template, including the documentation query expansion.
    #[must_use]
    pub const fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// Compiled matcher.
    #[must_use]
    pub const fn matcher(&self) -> &RouteMatcher {
        &self.matcher
    }

    /// Argument bindings in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[ArgumentBinding] {
        &self.arguments
    }

    /// The argument playing a paging role, if any.
    #[must_use]
    pub fn argument_with_role(&self, role: ParameterRole) -> Option<&ArgumentBinding> {
        self.arguments.iter().find(|a| a.role() == Some(role))
    }

    /// Result binding.
    #[must_use]
    pub const fn result(&self) -> &ResultBinding {
        &self.result
    }

    /// Classification.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The capability this method was registered for.
    #[must_use]
    pub const fn capability(&self) -> Option<Capability> {
        self.capability
    }

    /// The handler.
    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("controller", &self.controller)
            .field("method", &self.method)
            .field("verbs", &self.verbs)
            .field("template", &self.template.to_string())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
