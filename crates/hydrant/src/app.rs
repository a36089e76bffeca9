//! Assembling a dispatcher from configuration.
//!
//! [`HydrantBuilder`] wires the pieces a configured deployment needs: the
//! controller catalog, the JSON-LD converter, description endpoints, the
//! collection projector and the CORS policy.

use std::sync::Arc;
use std::time::Duration;

use hydrant_config::{ApiConfig, CorsConfig, HydrantConfig};
use hydrant_convert::ConverterRegistry;
use hydrant_core::{HydrantError, HydrantResult};
use hydrant_docs::{CollectionProjector, Documentation, DocumentationOptions, JsonLdConverter};
use hydrant_server::{
    ControllerCatalog, ControllerDefinition, CorsPolicy, Dispatcher, ResponseTransformer,
};
use tracing::info;

/// Builds a [`Dispatcher`] from a [`HydrantConfig`] and a set of controllers.
///
/// # Example
///
/// ```rust
/// use hydrant::{HydrantBuilder, HydrantConfig};
/// use hydrant::core::MethodInfo;
/// use hydrant::server::{ControllerDefinition, Outcome};
///
/// let dispatcher = HydrantBuilder::new(HydrantConfig::default())
///     .controller(ControllerDefinition::new("Ping", "/api/ping").method(
///         MethodInfo::new("get").returns::<String>(),
///         |_| async { Outcome::of("pong") },
///     ))
///     .build()
///     .unwrap();
///
/// // The ping operation plus its description endpoints.
/// assert!(dispatcher.table().controller("PingDescription").is_some());
/// ```
#[must_use]
pub struct HydrantBuilder {
    config: HydrantConfig,
    catalog: ControllerCatalog,
    converters: ConverterRegistry,
    transformers: Vec<Arc<dyn ResponseTransformer>>,
    documentation: bool,
    collections: bool,
}

impl HydrantBuilder {
    /// Creates a builder with the default converters.
    pub fn new(config: HydrantConfig) -> Self {
        Self {
            config,
            catalog: ControllerCatalog::new(),
            converters: ConverterRegistry::with_defaults(),
            transformers: Vec::new(),
            documentation: true,
            collections: true,
        }
    }

    /// Registers a controller.
    pub fn controller(mut self, controller: ControllerDefinition) -> Self {
        self.catalog.register(controller);
        self
    }

    /// Replaces the catalog, keeping nothing registered so far.
    pub fn catalog(mut self, catalog: ControllerCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the converter registry. The JSON-LD converter is still
    /// appended when the dispatcher is built.
    pub fn converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    /// Appends a response transformer. Transformers run after the collection
    /// projector.
    pub fn transformer<T: ResponseTransformer + 'static>(mut self, transformer: T) -> Self {
        self.transformers.push(Arc::new(transformer));
        self
    }

    /// Skips registering description endpoints.
    pub fn without_documentation(mut self) -> Self {
        self.documentation = false;
        self
    }

    /// Leaves list results as plain sequences for graph formats.
    pub fn without_collections(mut self) -> Self {
        self.collections = false;
        self
    }

    /// The configuration the dispatcher is built from.
    #[must_use]
    pub fn config(&self) -> &HydrantConfig {
        &self.config
    }

    /// Validates the configuration and builds the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the configuration is invalid or a
    /// controller fails to build.
    pub fn build(self) -> HydrantResult<Dispatcher> {
        self.config.validate().map_err(HydrantError::from)?;

        let mut catalog = self.catalog;
        if self.documentation {
            Documentation::attach(&mut catalog, &documentation_options(&self.config.api))?;
        }
        let table = catalog.build()?;

        let converters = self
            .converters
            .with(JsonLdConverter)
            .strict_accept(self.config.negotiation.strict_accept);

        info!(
            operations = table.len(),
            controllers = table.controllers().len(),
            media_types = ?converters.media_types(),
            strict_accept = converters.is_strict_accept(),
            "Dispatcher built"
        );

        let mut dispatcher =
            Dispatcher::new(table, converters).with_cors(cors_policy(&self.config.cors));
        if self.collections {
            dispatcher = dispatcher.with_transformer(CollectionProjector);
        }
        for transformer in self.transformers {
            dispatcher = dispatcher.with_transformer(transformer);
        }
        Ok(dispatcher)
    }
}

/// Description endpoint options for an `[api]` section.
#[must_use]
pub fn documentation_options(api: &ApiConfig) -> DocumentationOptions {
    let mut options = DocumentationOptions::new().segment(api.documentation_segment.clone());
    if let Some(base_uri) = &api.base_uri {
        options = options.base_uri(base_uri.clone());
    }
    if let Some(title) = &api.title {
        options = options.title(title.clone());
    }
    options
}

/// The CORS policy for a `[cors]` section.
#[must_use]
pub fn cors_policy(cors: &CorsConfig) -> CorsPolicy {
    let policy = if cors.allows_any_origin() {
        CorsPolicy::new().allow_any_origin()
    } else {
        CorsPolicy::new().allow_origins(cors.allowed_origins.iter().cloned())
    };
    let policy = policy.allow_headers(cors.allowed_headers.iter().cloned());
    if cors.max_age_secs == 0 {
        policy.no_max_age()
    } else {
        policy.max_age(Duration::from_secs(cors.max_age_secs))
    }
}

/// Installs the global log subscriber for a configuration.
///
/// # Errors
///
/// Returns a configuration error if a subscriber is already installed or the
/// level directive is invalid.
pub fn init_logging(config: &HydrantConfig) -> HydrantResult<()> {
    hydrant_telemetry::init_logging(&config.logging.to_log_config())?;
    Ok(())
}
