//! Projection of operation descriptors into a hypermedia graph.

use heck::ToUpperCamelCase;
use hydrant_core::{ArgumentSource, ResultTarget};
use hydrant_server::{OperationDescriptor, OperationKind};
use indexmap::IndexMap;
use tracing::debug;

use crate::graph::{ApiDocumentation, ClassNode, HypermediaGraph, HypermediaNode, OperationNode};
use crate::vocab::{class_iri, defined_class, shape_iri};

/// Builds Hydra API documentation from operation descriptors.
///
/// The output depends only on the descriptors, their order and the base
/// IRI, so describing an unchanged table twice yields identical graphs.
///
/// # Example
///
/// ```rust,ignore
/// use hydrant_docs::HypermediaDescriptionBuilder;
///
/// let graph = HypermediaDescriptionBuilder::new()
///     .title("Shop")
///     .class_for("Product", "Product")
///     .describe(table.for_controller("Product").map(|d| d.as_ref()), "http://shop.test");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HypermediaDescriptionBuilder {
    title: Option<String>,
    description: Option<String>,
    classes: IndexMap<String, String>,
}

impl HypermediaDescriptionBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the documentation title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the documentation description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names the class supporting a controller's operations. Defaults to
    /// the controller name.
    #[must_use]
    pub fn class_for(mut self, controller: impl Into<String>, class: impl Into<String>) -> Self {
        self.classes.insert(controller.into(), class.into());
        self
    }

    /// Describes `descriptors` relative to `base_iri`.
    pub fn describe<'a, I>(&self, descriptors: I, base_iri: &str) -> HypermediaGraph
    where
        I: IntoIterator<Item = &'a OperationDescriptor>,
    {
        let root_iri = base_iri.to_string();
        let mut graph = HypermediaGraph::new();
        let mut supported_classes: Vec<String> = Vec::new();
        graph.insert(HypermediaNode::ApiDocumentation(ApiDocumentation {
            id: root_iri.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            supported_classes: Vec::new(),
        }));

        for descriptor in descriptors {
            let class_name = self
                .classes
                .get(descriptor.controller())
                .map_or(descriptor.controller(), String::as_str);
            let class_id = ensure_class(&mut graph, &mut supported_classes, base_iri, class_name);

            let mut operation = operation_node(descriptor, base_iri);
            if graph.contains(&operation.id) {
                operation.id = format!("{}#{}", operation.id, descriptor.verb());
            }

            let referenced = descriptor
                .arguments()
                .iter()
                .filter(|argument| argument.source() == ArgumentSource::Body)
                .map(|argument| argument.shape())
                .chain(std::iter::once(descriptor.result().shape()))
                .filter_map(defined_class);
            for class in referenced {
                ensure_class(&mut graph, &mut supported_classes, base_iri, class);
            }

            if let Some(HypermediaNode::Class(class)) = graph.get_mut(&class_id) {
                if !class.supported_operations.contains(&operation.id) {
                    class.supported_operations.push(operation.id.clone());
                }
            }
            debug!(operation = %operation.id, "described operation");
            graph.insert(HypermediaNode::Operation(operation));
        }

        if let Some(HypermediaNode::ApiDocumentation(root)) = graph.get_mut(&root_iri) {
            root.supported_classes = supported_classes;
        }
        graph
    }
}

fn ensure_class(
    graph: &mut HypermediaGraph,
    supported: &mut Vec<String>,
    base_iri: &str,
    name: &str,
) -> String {
    let id = class_iri(base_iri, name);
    if !graph.contains(&id) {
        graph.insert(HypermediaNode::Class(ClassNode {
            id: id.clone(),
            label: name.to_string(),
            description: None,
            supported_operations: Vec::new(),
        }));
    }
    if !supported.contains(&id) {
        supported.push(id.clone());
    }
    id
}

fn operation_node(descriptor: &OperationDescriptor, base_iri: &str) -> OperationNode {
    let expects = descriptor
        .arguments()
        .iter()
        .filter(|argument| argument.source() == ArgumentSource::Body)
        .filter_map(|argument| shape_iri(argument.shape(), base_iri))
        .collect();
    let returns = match descriptor.result().target() {
        ResultTarget::Body => shape_iri(descriptor.result().shape(), base_iri)
            .into_iter()
            .collect(),
        ResultTarget::Header(_) => Vec::new(),
    };

    OperationNode {
        id: operation_iri(descriptor, base_iri),
        kind: descriptor.kind(),
        label: descriptor.method().to_string(),
        methods: descriptor.verbs().iter().map(ToString::to_string).collect(),
        expects,
        returns,
        status_codes: status_codes(descriptor.kind()),
    }
}

/// The operation IRI: base IRI plus the fixed part of the route, and for
/// operations with bound arguments a `#{VERB}{Arg}And{Arg}` fragment.
///
/// ```rust,ignore
/// // GET /api/product{?$skip,$top,$filter}
/// assert_eq!(operation_iri(&list, "http://shop.test"),
///            "http://shop.test/api/product#GETSkipAndTopAndFilter");
/// ```
#[must_use]
pub fn operation_iri(descriptor: &OperationDescriptor, base_iri: &str) -> String {
    let mut iri = format!(
        "{}{}",
        base_iri.trim_end_matches('/'),
        descriptor.template().fixed_path()
    );
    let names: Vec<String> = descriptor
        .arguments()
        .iter()
        .filter(|argument| argument.source() != ArgumentSource::Neutral)
        .map(|argument| argument.variable().trim_start_matches('$').to_upper_camel_case())
        .collect();
    if !names.is_empty() {
        iri.push('#');
        iri.push_str(descriptor.verb().as_str());
        iri.push_str(&names.join("And"));
    }
    iri
}

/// Conventional status codes of an operation kind.
#[must_use]
pub fn status_codes(kind: OperationKind) -> Vec<u16> {
    match kind {
        OperationKind::Create => vec![201],
        OperationKind::Update | OperationKind::Delete => vec![200, 204],
        OperationKind::Generic => vec![200],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::product_table;
    use hydrant_core::{MethodInfo, ParameterInfo};
    use hydrant_server::{ControllerCatalog, ControllerDefinition, Outcome};

    const BASE: &str = "http://shop.test";

    fn describe_products() -> HypermediaGraph {
        let table = product_table();
        HypermediaDescriptionBuilder::new()
            .title("Shop")
            .describe(table.for_controller("Product").map(|descriptor| &**descriptor), BASE)
    }

    #[test]
    fn test_operation_iris() {
        let graph = describe_products();
        let ids: Vec<&str> = graph.operations().map(|op| op.id.as_str()).collect();

        assert_eq!(
            ids,
            vec![
                "http://shop.test/api/product#GETSkipAndTopAndFilter",
                "http://shop.test/api/product#GETId",
                "http://shop.test/api/product#POSTEntity",
                "http://shop.test/api/product#PUTIdAndEntity",
                "http://shop.test/api/product#DELETEId",
            ]
        );
    }

    #[test]
    fn test_operation_classification_and_status_codes() {
        let graph = describe_products();

        let create = graph.operation("http://shop.test/api/product#POSTEntity").unwrap();
        assert_eq!(create.kind, OperationKind::Create);
        assert_eq!(create.status_codes, vec![201]);
        assert_eq!(create.expects, vec!["http://shop.test#Product".to_string()]);
        assert!(create.returns.is_empty());

        let update = graph.operation("http://shop.test/api/product#PUTIdAndEntity").unwrap();
        assert_eq!(update.kind, OperationKind::Update);
        assert_eq!(update.status_codes, vec![200, 204]);

        let get = graph.operation("http://shop.test/api/product#GETId").unwrap();
        assert_eq!(get.kind, OperationKind::Generic);
        assert_eq!(get.methods, vec!["GET".to_string()]);
        assert_eq!(get.returns, vec!["http://shop.test#Product".to_string()]);
        assert_eq!(get.status_codes, vec![200]);

        let list = graph
            .operation("http://shop.test/api/product#GETSkipAndTopAndFilter")
            .unwrap();
        assert_eq!(list.returns, vec!["hydra:Collection".to_string()]);
    }

    #[test]
    fn test_class_supports_every_operation() {
        let graph = describe_products();

        let class = graph.class("http://shop.test#Product").unwrap();
        assert_eq!(class.label, "Product");
        assert_eq!(class.supported_operations.len(), 5);

        let root = graph.documentation().unwrap();
        assert_eq!(root.id, BASE);
        assert_eq!(root.title.as_deref(), Some("Shop"));
        assert_eq!(root.supported_classes, vec!["http://shop.test#Product".to_string()]);
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let first = describe_products().to_json_ld_string().unwrap();
        let second = describe_products().to_json_ld_string().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_argument_less_operations_do_not_collide() {
        let table = ControllerCatalog::new()
            .with(
                ControllerDefinition::new("Clock", "/api/clock")
                    .method(MethodInfo::new("now").route("").returns::<String>(), |_| async {
                        Outcome::of("12:00")
                    })
                    .method(
                        MethodInfo::new("reset").verb(http::Method::POST).route(""),
                        |_| async { Ok(Outcome::empty()) },
                    ),
            )
            .build()
            .unwrap();
        let graph = HypermediaDescriptionBuilder::new()
            .describe(table.for_controller("Clock").map(|descriptor| &**descriptor), BASE);
        let ids: Vec<&str> = graph.operations().map(|op| op.id.as_str()).collect();

        assert_eq!(ids, vec!["http://shop.test/api/clock", "http://shop.test/api/clock#POST"]);
    }

    #[test]
    fn test_class_override() {
        let table = ControllerCatalog::new()
            .with(ControllerDefinition::new("Search", "/api/search").method(
                MethodInfo::new("find")
                    .param(ParameterInfo::new::<String>("term"))
                    .returns::<Vec<String>>(),
                |_| async { Outcome::of(&Vec::<String>::new()) },
            ))
            .build()
            .unwrap();
        let graph = HypermediaDescriptionBuilder::new()
            .class_for("Search", "SearchResult")
            .describe(table.descriptors().iter().map(|descriptor| &**descriptor), BASE);

        let class = graph.class("http://shop.test#SearchResult").unwrap();
        assert_eq!(
            class.supported_operations,
            vec!["http://shop.test/api/search#GETTerm".to_string()]
        );
    }
}
