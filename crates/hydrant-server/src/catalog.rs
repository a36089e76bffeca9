//! Controller catalog and the immutable descriptor table.

use std::fmt;
use std::sync::Arc;

use http::Method;
use hydrant_core::{Capability, HydrantError, HydrantResult, TypeShape};
use hydrant_router::{Resolution, RouteTable};
use tracing::info;

use crate::builder::OperationDescriptorBuilder;
use crate::controller::ControllerDefinition;
use crate::descriptor::OperationDescriptor;

/// Summary of a registered controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerInfo {
    name: String,
    base_route: String,
    capabilities: Vec<Capability>,
    entity: Option<TypeShape>,
    description: Option<String>,
}

impl ControllerInfo {
    fn from_definition(definition: &ControllerDefinition) -> Self {
        Self {
            name: definition.name().to_string(),
            base_route: definition.base_route().to_string(),
            capabilities: definition.capabilities().to_vec(),
            entity: definition.entity_shape().cloned(),
            description: definition.description_text().map(ToString::to_string),
        }
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

    /// Whether `capability` is declared.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Entity class, if declared.
    #[must_use]
    pub const fn entity(&self) -> Option<&TypeShape> {
        self.entity.as_ref()
    }

    /// Description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Every operation served by a dispatcher, in registration order.
///
/// Built once by [`ControllerCatalog::build`] and shared behind an `Arc`.
pub struct DescriptorTable {
    controllers: Vec<ControllerInfo>,
    descriptors: Vec<Arc<OperationDescriptor>>,
    routes: RouteTable<Arc<OperationDescriptor>>,
}

impl DescriptorTable {
    /// All descriptors in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[Arc<OperationDescriptor>] {
        &self.descriptors
    }

    /// Registered controllers.
    #[must_use]
    pub fn controllers(&self) -> &[ControllerInfo] {
        &self.controllers
    }

    /// Looks up a controller by name.
    #[must_use]
    pub fn controller(&self, name: &str) -> Option<&ControllerInfo> {
        self.controllers.iter().find(|c| c.name == name)
    }

    /// Descriptors of one controller.
    pub fn for_controller<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<OperationDescriptor>> + 'a {
        self.descriptors.iter().filter(move |d| d.controller() == name)
    }

    /// Resolves a verb and path to the most specific descriptor.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_, Arc<OperationDescriptor>> {
        self.routes.resolve(method, path)
    }

    /// Verbs accepted on a path.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.routes.allowed_methods(path)
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl fmt::Debug for DescriptorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorTable")
            .field("controllers", &self.controllers.len())
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

/// The controllers an application serves, supplied at startup.
///
/// # Example
///
/// ```rust
/// use hydrant_server::{ControllerCatalog, ControllerDefinition, Outcome};
/// use hydrant_core::MethodInfo;
///
/// let mut catalog = ControllerCatalog::new();
/// catalog.register(
///     ControllerDefinition::new("Health", "/health")
///         .method(MethodInfo::new("get"), |_| async { Outcome::of("ok") }),
/// );
///
/// let table = catalog.build().unwrap();
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ControllerCatalog {
    controllers: Vec<ControllerDefinition>,
    builder: OperationDescriptorBuilder,
}

impl ControllerCatalog {
    /// Creates an empty catalog using the default resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom descriptor builder.
    #[must_use]
    pub fn with_builder(mut self, builder: OperationDescriptorBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Adds a controller.
    pub fn register(&mut self, controller: ControllerDefinition) -> &mut Self {
        self.controllers.push(controller);
        self
    }

    /// Adds a controller, builder style.
    #[must_use]
    pub fn with(mut self, controller: ControllerDefinition) -> Self {
        self.controllers.push(controller);
        self
    }

    /// Registered controllers.
    #[must_use]
    pub fn controllers(&self) -> &[ControllerDefinition] {
        &self.controllers
    }

    /// Builds the descriptor table.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error of any controller.
    pub fn build(&self) -> HydrantResult<DescriptorTable> {
        let mut descriptors = Vec::new();
        let mut routes = RouteTable::new();

        for controller in &self.controllers {
            for descriptor in self.builder.build(controller)? {
                let descriptor = Arc::new(descriptor);
                routes
                    .insert(
                        descriptor.template().clone(),
                        descriptor.verbs().to_vec(),
                        Arc::clone(&descriptor),
                    )
                    .map_err(|e| HydrantError::configuration(controller.name(), e.to_string()))?;
                descriptors.push(descriptor);
            }
        }

        info!(
            controllers = self.controllers.len(),
            operations = descriptors.len(),
            "descriptor table built"
        );

        Ok(DescriptorTable {
            controllers: self.controllers.iter().map(ControllerInfo::from_definition).collect(),
            descriptors,
            routes,
        })
    }
}
