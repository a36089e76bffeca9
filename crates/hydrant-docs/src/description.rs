//! Self-description endpoints.
//!
//! [`Documentation::attach`] adds a `{Name}Description` controller next to
//! every registered controller. It answers on the controller's base route:
//!
//! | Verb | Route | Result |
//! |------|-------|--------|
//! | GET | `{base}/documentation{?format}` | the controller's API documentation |
//! | OPTIONS | `{base}` | the same document |
//!
//! The document is a [`HypermediaGraph`] written through content
//! negotiation; `format` forces the output media type.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use http::{header, HeaderValue, Method, Uri};
use hydrant_convert::media;
use hydrant_core::{HydrantError, HydrantResult, MethodInfo, ParameterInfo, RequestInfo, TypeShape};
use hydrant_server::{ControllerCatalog, ControllerDefinition, Invocation, Outcome};
use tracing::{debug, info};

use crate::builder::HypermediaDescriptionBuilder;
use crate::error::{DocsError, DocsResult};
use crate::graph::HypermediaGraph;
use crate::jsonld::APPLICATION_LD_JSON;
use crate::vocab::defined_class;

/// Default path segment of the documentation route.
pub const DEFAULT_DOCUMENTATION_SEGMENT: &str = "documentation";

const DESCRIPTION_SUFFIX: &str = "Description";

/// Options of the generated description controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationOptions {
    base_uri: Option<String>,
    segment: String,
    title: Option<String>,
}

impl Default for DocumentationOptions {
    fn default() -> Self {
        Self {
            base_uri: None,
            segment: DEFAULT_DOCUMENTATION_SEGMENT.to_string(),
            title: None,
        }
    }
}

impl DocumentationOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the base IRI of emitted documents. Without one, the base URL of
    /// each request is used.
    #[must_use]
    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Sets the documentation route segment.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = segment.into();
        self
    }

    /// Sets the documentation title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The configured base IRI.
    #[must_use]
    pub fn base_uri_value(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    /// The documentation route segment.
    #[must_use]
    pub fn segment_value(&self) -> &str {
        &self.segment
    }

    /// Checks the base IRI and the segment.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::InvalidBaseIri`] unless the base IRI is an
    /// absolute `http` or `https` URI, and [`DocsError::InvalidSegment`] for
    /// an empty segment or one containing `/`.
    pub fn validate(&self) -> DocsResult<()> {
        if let Some(iri) = &self.base_uri {
            let invalid = |reason: &str| DocsError::InvalidBaseIri {
                iri: iri.clone(),
                reason: reason.to_string(),
            };
            let uri: Uri = iri.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;
            if !matches!(uri.scheme_str(), Some("http" | "https")) {
                return Err(invalid("scheme must be http or https"));
            }
            if uri.authority().is_none() {
                return Err(invalid("missing authority"));
            }
        }
        if self.segment.is_empty() || self.segment.contains('/') {
            return Err(DocsError::InvalidSegment {
                segment: self.segment.clone(),
            });
        }
        Ok(())
    }
}

/// Output formats selectable with the `format` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    /// Turtle.
    Turtle,
    /// RDF/XML.
    Rdf,
    /// OWL, written as RDF/XML.
    Owl,
    /// RDF/XML labelled `application/xml`.
    Xml,
    /// JSON-LD.
    JsonLd,
}

impl DescriptionFormat {
    const ALL: [Self; 5] = [Self::JsonLd, Self::Turtle, Self::Rdf, Self::Owl, Self::Xml];

    /// The format name accepted by `format`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Turtle => "turtle",
            Self::Rdf => "rdf",
            Self::Owl => "owl",
            Self::Xml => "xml",
            Self::JsonLd => "jsonld",
        }
    }

    /// Media type the document is written as.
    #[must_use]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Turtle => "text/turtle",
            Self::Rdf | Self::Owl | Self::Xml => "application/rdf+xml",
            Self::JsonLd => APPLICATION_LD_JSON,
        }
    }

    /// File extension used in `Content-Disposition`.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::Rdf | Self::Owl | Self::Xml => "rdf",
            Self::JsonLd => "jsonld",
        }
    }

    /// `Content-Type` replacing the negotiated one, if any.
    #[must_use]
    pub const fn forced_content_type(self) -> Option<&'static str> {
        match self {
            Self::Xml => Some("application/xml"),
            _ => None,
        }
    }
}

impl fmt::Display for DescriptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptionFormat {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DocsError::UnknownFormat {
                format: s.to_string(),
            })
    }
}

/// File extension for a document requested without `format`.
///
/// `txt` unless the client accepts anything, in which case the first
/// accepted graph media type decides.
#[must_use]
pub fn fallback_extension(request: &RequestInfo) -> &'static str {
    let accepted = media::accepted(request.headers());
    if !accepted.iter().any(media::is_any) {
        return "txt";
    }
    accepted
        .iter()
        .find_map(|range| {
            DescriptionFormat::ALL
                .into_iter()
                .find(|format| media::names(range, format.media_type()))
        })
        .map_or("txt", DescriptionFormat::extension)
}

/// What a description controller describes.
#[derive(Debug)]
struct DescribedController {
    name: String,
    class: String,
    description: Option<String>,
    options: DocumentationOptions,
}

impl DescribedController {
    fn from_definition(definition: &ControllerDefinition, options: &DocumentationOptions) -> Self {
        let class = definition
            .entity_shape()
            .and_then(defined_class)
            .unwrap_or(definition.name())
            .to_string();
        Self {
            name: definition.name().to_string(),
            class,
            description: definition.description_text().map(ToString::to_string),
            options: options.clone(),
        }
    }

    fn graph(&self, invocation: &Invocation) -> HypermediaGraph {
        let base = self
            .options
            .base_uri
            .clone()
            .unwrap_or_else(|| invocation.request().base_url());
        let mut builder = HypermediaDescriptionBuilder::new().class_for(&self.name, &self.class);
        if let Some(title) = &self.options.title {
            builder = builder.title(title);
        }
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        let table = invocation.table();
        builder.describe(
            table.for_controller(&self.name).map(|descriptor| &**descriptor),
            &base,
        )
    }

    fn respond(&self, invocation: &Invocation, format: Option<DescriptionFormat>) -> HydrantResult<Outcome> {
        let graph = self.graph(invocation);
        debug!(controller = %self.name, nodes = graph.len(), "describing controller");

        let mut outcome = Outcome::from_value(graph.to_json_ld()).with_shape(TypeShape::Graph);
        let extension = match format {
            Some(format) => {
                outcome = outcome.with_media_type(format.media_type());
                if let Some(content_type) = format.forced_content_type() {
                    outcome = outcome.with_header(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
                format.extension()
            }
            None => fallback_extension(invocation.request()),
        };
        let disposition = format!("inline; filename=\"{}.{extension}\"", self.name);
        let disposition = HeaderValue::from_str(&disposition)
            .map_err(|e| HydrantError::internal(format!("invalid Content-Disposition: {e}")))?;
        Ok(outcome.with_header(header::CONTENT_DISPOSITION, disposition))
    }
}

fn describe_method(segment: &str) -> MethodInfo {
    MethodInfo::new("describe")
        .verb(Method::GET)
        .route(format!("/{segment}"))
        .param(ParameterInfo::new::<Option<String>>("format").from_query())
        .returns_shape(TypeShape::Graph)
}

fn describe_entry_method() -> MethodInfo {
    MethodInfo::new("describe_entry")
        .verb(Method::OPTIONS)
        .route("")
        .returns_shape(TypeShape::Graph)
}

/// Registers description controllers.
#[derive(Debug, Clone, Copy)]
pub struct Documentation;

impl Documentation {
    /// Adds a `{Name}Description` controller for every controller of
    /// `catalog` that has none yet.
    ///
    /// Description controllers are not described themselves, and attaching
    /// twice adds nothing.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `options` are invalid or a
    /// registered controller already uses a generated controller's name.
    pub fn attach(catalog: &mut ControllerCatalog, options: &DocumentationOptions) -> HydrantResult<()> {
        options.validate()?;

        let controllers = catalog.controllers();
        let described: Vec<&str> = controllers
            .iter()
            .filter_map(ControllerDefinition::described_controller)
            .collect();

        let mut pending = Vec::new();
        for definition in controllers {
            if definition.described_controller().is_some() || described.contains(&definition.name()) {
                continue;
            }
            let name = description_name(definition.name());
            if controllers.iter().any(|other| other.name() == name) {
                return Err(HydrantError::configuration(
                    name,
                    format!("name is taken, cannot describe controller {}", definition.name()),
                ));
            }
            pending.push(description_controller(definition, options));
        }

        for definition in pending {
            info!(controller = %definition.name(), route = %definition.base_route(), "attaching description");
            catalog.register(definition);
        }
        Ok(())
    }
}

fn description_name(controller: &str) -> String {
    format!("{controller}{DESCRIPTION_SUFFIX}")
}

fn description_controller(definition: &ControllerDefinition, options: &DocumentationOptions) -> ControllerDefinition {
    let described = Arc::new(DescribedController::from_definition(definition, options));
    let entry = Arc::clone(&described);

    ControllerDefinition::new(description_name(definition.name()), definition.base_route())
        .describing(definition.name())
        .description(format!("Describes the {} controller", definition.name()))
        .method(describe_method(&options.segment), move |invocation| {
            let described = Arc::clone(&described);
            async move {
                let format: Option<String> = invocation.get("format")?;
                let format: Option<DescriptionFormat> = format.as_deref().map(str::parse).transpose()?;
                described.respond(&invocation, format)
            }
        })
        .method(describe_entry_method(), move |invocation| {
            let described = Arc::clone(&entry);
            async move { described.respond(&invocation, None) }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonld::JsonLdConverter;
    use crate::testing::{product_catalog, ProductStore};
    use http::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE};
    use http::StatusCode;
    use hydrant_convert::ConverterRegistry;
    use hydrant_core::ErrorCategory;
    use hydrant_server::Dispatcher;
    use serde_json::Value;

    fn dispatcher(options: &DocumentationOptions) -> Dispatcher {
        let mut catalog = product_catalog(ProductStore::seeded(3));
        Documentation::attach(&mut catalog, options).unwrap();
        let table = catalog.build().unwrap();
        Dispatcher::new(table, ConverterRegistry::with_defaults().with(JsonLdConverter))
    }

    fn request(method: Method, uri: &'static str, accept: &'static str) -> RequestInfo {
        RequestInfo::new(method, Uri::from_static(uri)).with_header(ACCEPT, HeaderValue::from_static(accept))
    }

    fn graph_ids(body: &str) -> Vec<String> {
        let document: Value = serde_json::from_str(body).unwrap();
        document["@graph"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|node| node["@id"].as_str().map(ToString::to_string))
            .collect()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSONLD".parse::<DescriptionFormat>().unwrap(), DescriptionFormat::JsonLd);
        assert_eq!("turtle".parse::<DescriptionFormat>().unwrap(), DescriptionFormat::Turtle);
        assert!(matches!(
            "yaml".parse::<DescriptionFormat>(),
            Err(DocsError::UnknownFormat { .. })
        ));
        assert_eq!(DescriptionFormat::Owl.media_type(), "application/rdf+xml");
        assert_eq!(DescriptionFormat::Xml.forced_content_type(), Some("application/xml"));
        assert_eq!(DescriptionFormat::Turtle.extension(), "ttl");
    }

    #[test]
    fn test_options_validation() {
        assert!(DocumentationOptions::new().validate().is_ok());
        assert!(DocumentationOptions::new()
            .base_uri("https://shop.test/")
            .validate()
            .is_ok());
        assert!(matches!(
            DocumentationOptions::new().base_uri("/relative").validate(),
            Err(DocsError::InvalidBaseIri { .. })
        ));
        assert!(matches!(
            DocumentationOptions::new().base_uri("ftp://shop.test").validate(),
            Err(DocsError::InvalidBaseIri { .. })
        ));
        assert!(matches!(
            DocumentationOptions::new().segment("a/b").validate(),
            Err(DocsError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn test_fallback_extension() {
        let anything = request(Method::GET, "/api/product/documentation", "*/*");
        assert_eq!(fallback_extension(&anything), "txt");

        let graph = request(Method::GET, "/api/product/documentation", "text/turtle, */*");
        assert_eq!(fallback_extension(&graph), "ttl");

        let json = request(Method::GET, "/api/product/documentation", "application/json");
        assert_eq!(fallback_extension(&json), "txt");
    }

    #[test]
    fn test_attach_once_per_controller() {
        let mut catalog = product_catalog(ProductStore::default());
        let options = DocumentationOptions::new();
        Documentation::attach(&mut catalog, &options).unwrap();
        Documentation::attach(&mut catalog, &options).unwrap();

        let names: Vec<&str> = catalog.controllers().iter().map(ControllerDefinition::name).collect();
        assert_eq!(names, vec!["Product", "ProductDescription"]);
    }

    #[test]
    fn test_attach_describes_controllers_named_like_descriptions() {
        let mut catalog = ControllerCatalog::new().with(
            ControllerDefinition::new("JobDescription", "/api/job-description").method(
                MethodInfo::new("get").returns::<String>(),
                |_| async { Outcome::of("clerk") },
            ),
        );
        Documentation::attach(&mut catalog, &DocumentationOptions::new()).unwrap();

        let names: Vec<&str> = catalog.controllers().iter().map(ControllerDefinition::name).collect();
        assert_eq!(names, vec!["JobDescription", "JobDescriptionDescription"]);
        assert_eq!(catalog.controllers()[1].described_controller(), Some("JobDescription"));
    }

    #[test]
    fn test_attach_rejects_taken_description_name() {
        let ping = |name: &str, route: &str| {
            ControllerDefinition::new(name, route).method(
                MethodInfo::new("get").returns::<String>(),
                |_| async { Outcome::of("pong") },
            )
        };
        let mut catalog = ControllerCatalog::new()
            .with(ping("Ping", "/api/ping"))
            .with(ping("PingDescription", "/api/ping-description"));

        let err = Documentation::attach(&mut catalog, &DocumentationOptions::new()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(catalog.controllers().len(), 2);
    }

    #[test]
    fn test_attach_rejects_invalid_options() {
        let mut catalog = product_catalog(ProductStore::default());
        let err = Documentation::attach(&mut catalog, &DocumentationOptions::new().segment(""))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(catalog.controllers().len(), 1);
    }

    #[tokio::test]
    async fn test_documentation_route() {
        let dispatcher = dispatcher(&DocumentationOptions::new().title("Shop"));
        let response = dispatcher
            .dispatch(request(
                Method::GET,
                "http://shop.test/api/product/documentation",
                APPLICATION_LD_JSON,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_str(CONTENT_TYPE), Some(APPLICATION_LD_JSON));
        assert_eq!(
            response.header_str(CONTENT_DISPOSITION),
            Some("inline; filename=\"Product.txt\"")
        );

        let ids = graph_ids(response.body_str().unwrap());
        assert_eq!(ids[0], "http://shop.test");
        assert!(ids.contains(&"http://shop.test#Product".to_string()));
        assert!(ids.contains(&"http://shop.test/api/product#GETId".to_string()));
        assert!(!ids.iter().any(|id| id.contains("documentation")));
    }

    #[tokio::test]
    async fn test_options_on_base_route() {
        let dispatcher = dispatcher(&DocumentationOptions::new().base_uri("https://api.shop.test"));
        let response = dispatcher
            .dispatch(request(Method::OPTIONS, "/api/product", "application/json"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_str(CONTENT_TYPE), Some("application/json"));
        let ids = graph_ids(response.body_str().unwrap());
        assert_eq!(ids[0], "https://api.shop.test");
    }

    #[tokio::test]
    async fn test_format_argument() {
        let dispatcher = dispatcher(&DocumentationOptions::new());

        let response = dispatcher
            .dispatch(request(
                Method::GET,
                "http://shop.test/api/product/documentation?format=jsonld",
                "text/plain",
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_str(CONTENT_TYPE), Some(APPLICATION_LD_JSON));
        assert_eq!(
            response.header_str(CONTENT_DISPOSITION),
            Some("inline; filename=\"Product.jsonld\"")
        );

        let unknown = dispatcher
            .dispatch(request(Method::GET, "/api/product/documentation?format=yaml", "*/*"))
            .await;
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

        let turtle = dispatcher
            .dispatch(request(Method::GET, "/api/product/documentation?format=turtle", "*/*"))
            .await;
        assert_eq!(turtle.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_documentation_segment_does_not_shadow_entities() {
        let dispatcher = dispatcher(&DocumentationOptions::new());
        let response = dispatcher
            .dispatch(request(Method::GET, "/api/product/2", "application/json"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let product: Value = serde_json::from_str(response.body_str().unwrap()).unwrap();
        assert_eq!(product["id"], 2);
    }
}
