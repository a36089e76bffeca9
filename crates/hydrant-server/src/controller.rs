//! Controller definitions and type-erased handlers.
//!
//! A controller is registered explicitly: a name, a base route, the
//! capabilities it implements and one handler per method. Handlers receive
//! an [`Invocation`] holding the bound arguments and return an [`Outcome`].
//!
//! # Example
//!
//! ```rust
//! use hydrant_server::{ControllerDefinition, Outcome};
//! use hydrant_core::{MethodInfo, ParameterInfo};
//!
//! let controller = ControllerDefinition::new("Greeter", "/api/greeter").method(
//!     MethodInfo::new("hello")
//!         .param(ParameterInfo::new::<String>("name"))
//!         .returns::<String>(),
//!     |invocation| async move {
//!         let name: String = invocation.get("name")?;
//!         Outcome::of(&format!("Hello, {name}!"))
//!     },
//! );
//!
//! assert_eq!(controller.methods().len(), 1);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hydrant_core::{Capability, ClaimIdentity, HydrantResult, MethodInfo, RequestInfo, TypeShape};
use hydrant_extract::Arguments;
use serde::de::DeserializeOwned;

use crate::catalog::DescriptorTable;
use crate::outcome::Outcome;

/// Type alias for a boxed handler future.
pub type BoxedHandlerResult = Pin<Box<dyn Future<Output = HydrantResult<Outcome>> + Send>>;

/// A type-erased handler function.
pub type Handler = Arc<dyn Fn(Invocation) -> BoxedHandlerResult + Send + Sync>;

/// Everything a handler gets to see of one request.
#[derive(Debug, Clone)]
pub struct Invocation {
    arguments: Arguments,
    request: Arc<RequestInfo>,
    table: Arc<DescriptorTable>,
}

impl Invocation {
    /// Creates an invocation.
    #[must_use]
    pub fn new(arguments: Arguments, request: Arc<RequestInfo>, table: Arc<DescriptorTable>) -> Self {
        Self {
            arguments,
            request,
            table,
        }
    }

    /// Deserializes a bound argument.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> HydrantResult<T> {
        self.arguments.get(name)
    }

    /// All bound arguments.
    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// The request being served.
    #[must_use]
    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    /// The caller's identity.
    #[must_use]
    pub fn identity(&self) -> &ClaimIdentity {
        self.request.identity()
    }

    /// Every operation the dispatcher serves.
    #[must_use]
    pub fn table(&self) -> &Arc<DescriptorTable> {
        &self.table
    }
}

/// A registered method and its handler.
#[derive(Clone)]
pub struct MethodRegistration {
    info: MethodInfo,
    handler: Handler,
}

impl MethodRegistration {
    /// Method metadata.
    #[must_use]
    pub const fn info(&self) -> &MethodInfo {
        &self.info
    }

    /// The handler.
    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl std::fmt::Debug for MethodRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistration")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Explicit description of one controller.
#[derive(Debug, Clone)]
pub struct ControllerDefinition {
    name: String,
    base_route: String,
    capabilities: Vec<Capability>,
    entity: Option<TypeShape>,
    description: Option<String>,
    describes: Option<String>,
    methods: Vec<MethodRegistration>,
}

impl ControllerDefinition {
    /// Creates a controller with no methods.
    #[must_use]
    pub fn new(name: impl Into<String>, base_route: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_route: base_route.into(),
            capabilities: Vec::new(),
            entity: None,
            description: None,
            describes: None,
            methods: Vec::new(),
        }
    }

    /// Declares a capability.
    #[must_use]
    pub fn capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Names the entity class the controller manages.
    #[must_use]
    pub fn entity(mut self, entity: TypeShape) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Human-readable description used in documentation.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Registers a method.
    #[must_use]
    pub fn method<F, Fut>(mut self, info: MethodInfo, handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HydrantResult<Outcome>> + Send + 'static,
    {
        self.push_method(info, handler);
        self
    }

    /// Registers a method on an existing definition.
    pub fn push_method<F, Fut>(&mut self, info: MethodInfo, handler: F)
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HydrantResult<Outcome>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let erased: Handler = Arc::new(move |invocation: Invocation| {
            let handler = Arc::clone(&handler);
            Box::pin(async move { handler(invocation).await })
        });
        self.methods.push(MethodRegistration {
            info,
            handler: erased,
        });
    }

    /// Controller name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base route template.
    #[must_use]
    pub fn base_route(&self) -> &str {
        &self.base_route
    }

    /// Declared capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Entity class, if declared.
    #[must_use]
    pub const fn entity_shape(&self) -> Option<&TypeShape> {
        self.entity.as_ref()
    }

    /// Description, if any.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Marks this controller as generated to describe another controller.
    #[must_use]
    pub fn describing(mut self, controller: impl Into<String>) -> Self {
        self.describes = Some(controller.into());
        self
    }

    /// Name of the controller this one was generated to describe.
    #[must_use]
    pub fn described_controller(&self) -> Option<&str> {
        self.describes.as_deref()
    }

    /// Registered methods in registration order.
    #[must_use]
    pub fn methods(&self) -> &[MethodRegistration] {
        &self.methods
    }
}
