//! The hypermedia graph model.
//!
//! A [`HypermediaGraph`] is a set of nodes keyed by IRI. Nodes refer to each
//! other by IRI only; a reference is resolved by looking the IRI up in the
//! graph. Insertion order is preserved, so serializing the same graph twice
//! yields identical bytes.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use hydrant_server::OperationKind;

use crate::error::DocsResult;
use crate::vocab;

/// Root of an API description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDocumentation {
    /// Node IRI.
    pub id: String,
    /// API title.
    pub title: Option<String>,
    /// API description.
    pub description: Option<String>,
    /// IRIs of the described classes.
    pub supported_classes: Vec<String>,
}

/// One operation of the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationNode {
    /// Node IRI.
    pub id: String,
    /// Classification.
    pub kind: OperationKind,
    /// Method name.
    pub label: String,
    /// Accepted verbs.
    pub methods: Vec<String>,
    /// Classes expected in the request body.
    pub expects: Vec<String>,
    /// Classes returned in the response body.
    pub returns: Vec<String>,
    /// Conventional status codes.
    pub status_codes: Vec<u16>,
}

/// A class and the operations it supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    /// Node IRI.
    pub id: String,
    /// Class name.
    pub label: String,
    /// Free-text description.
    pub description: Option<String>,
    /// IRIs of supported operations.
    pub supported_operations: Vec<String>,
}

/// A collection of members.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionNode {
    /// Node IRI.
    pub id: String,
    /// Full, unpaged count.
    pub total_items: u64,
    /// Members, embedded as they were serialized.
    pub members: Vec<Value>,
    /// IRI of the attached partial view.
    pub view: Option<String>,
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialCollectionView {
    /// Node IRI, the URL of this page.
    pub id: String,
    /// Page size.
    pub items_per_page: u64,
    /// First page.
    pub first: String,
    /// Previous page, absent on the first page.
    pub previous: Option<String>,
    /// Next page, absent on the last page.
    pub next: Option<String>,
    /// Last page.
    pub last: String,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq)]
pub enum HypermediaNode {
    /// `hydra:ApiDocumentation`.
    ApiDocumentation(ApiDocumentation),
    /// `hydra:Operation` and its specializations.
    Operation(OperationNode),
    /// `hydra:Class`.
    Class(ClassNode),
    /// `hydra:Collection`.
    Collection(CollectionNode),
    /// `hydra:PartialCollectionView`.
    PartialCollectionView(PartialCollectionView),
}

impl HypermediaNode {
    /// The node IRI.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::ApiDocumentation(node) => &node.id,
            Self::Operation(node) => &node.id,
            Self::Class(node) => &node.id,
            Self::Collection(node) => &node.id,
            Self::PartialCollectionView(node) => &node.id,
        }
    }

    /// Renders the node as a JSON-LD object using the shared context
    /// prefixes.
    #[must_use]
    pub fn to_json_ld(&self) -> Value {
        let mut object = Map::new();
        object.insert("@id".into(), Value::from(self.id()));
        match self {
            Self::ApiDocumentation(node) => {
                object.insert("@type".into(), json!("hydra:ApiDocumentation"));
                insert_text(&mut object, "hydra:title", node.title.as_deref());
                insert_text(&mut object, "hydra:description", node.description.as_deref());
                object.insert("hydra:supportedClass".into(), references(&node.supported_classes));
            }
            Self::Operation(node) => {
                let types = match node.kind {
                    OperationKind::Generic => json!("hydra:Operation"),
                    kind => json!(["hydra:Operation", format!("hydra:{kind}")]),
                };
                object.insert("@type".into(), types);
                object.insert("rdfs:label".into(), Value::from(node.label.as_str()));
                let method = match node.methods.as_slice() {
                    [single] => Value::from(single.as_str()),
                    many => json!(many),
                };
                object.insert("hydra:method".into(), method);
                object.insert("hydra:expects".into(), references(&node.expects));
                object.insert("hydra:returns".into(), references(&node.returns));
                object.insert("hydra:statusCode".into(), json!(node.status_codes));
            }
            Self::Class(node) => {
                object.insert("@type".into(), json!("hydra:Class"));
                object.insert("rdfs:label".into(), Value::from(node.label.as_str()));
                insert_text(&mut object, "rdfs:comment", node.description.as_deref());
                object.insert(
                    "hydra:supportedOperation".into(),
                    references(&node.supported_operations),
                );
            }
            Self::Collection(node) => {
                object.insert("@type".into(), json!("hydra:Collection"));
                object.insert("hydra:totalItems".into(), Value::from(node.total_items));
                object.insert("hydra:member".into(), Value::Array(node.members.clone()));
                if let Some(view) = &node.view {
                    object.insert("hydra:view".into(), json!({ "@id": view }));
                }
            }
            Self::PartialCollectionView(node) => {
                object.insert("@type".into(), json!("hydra:PartialCollectionView"));
                object.insert("hydra:itemsPerPage".into(), Value::from(node.items_per_page));
                object.insert("hydra:first".into(), json!({ "@id": node.first }));
                if let Some(previous) = &node.previous {
                    object.insert("hydra:previous".into(), json!({ "@id": previous }));
                }
                if let Some(next) = &node.next {
                    object.insert("hydra:next".into(), json!({ "@id": next }));
                }
                object.insert("hydra:last".into(), json!({ "@id": node.last }));
            }
        }
        Value::Object(object)
    }
}

fn insert_text(object: &mut Map<String, Value>, key: &str, text: Option<&str>) {
    if let Some(text) = text {
        object.insert(key.into(), Value::from(text));
    }
}

fn references(iris: &[String]) -> Value {
    iris.iter().map(|iri| json!({ "@id": iri })).collect()
}

/// An IRI-keyed set of hypermedia nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HypermediaGraph {
    nodes: IndexMap<String, HypermediaNode>,
}

impl HypermediaGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, replacing any node with the same IRI in place.
    pub fn insert(&mut self, node: HypermediaNode) {
        self.nodes.insert(node.id().to_string(), node);
    }

    /// Whether a node with this IRI exists.
    #[must_use]
    pub fn contains(&self, iri: &str) -> bool {
        self.nodes.contains_key(iri)
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, iri: &str) -> Option<&HypermediaNode> {
        self.nodes.get(iri)
    }

    pub(crate) fn get_mut(&mut self, iri: &str) -> Option<&mut HypermediaNode> {
        self.nodes.get_mut(iri)
    }

    /// Looks up an operation node.
    #[must_use]
    pub fn operation(&self, iri: &str) -> Option<&OperationNode> {
        match self.get(iri)? {
            HypermediaNode::Operation(node) => Some(node),
            _ => None,
        }
    }

    /// Looks up a class node.
    #[must_use]
    pub fn class(&self, iri: &str) -> Option<&ClassNode> {
        match self.get(iri)? {
            HypermediaNode::Class(node) => Some(node),
            _ => None,
        }
    }

    /// Looks up a collection node.
    #[must_use]
    pub fn collection(&self, iri: &str) -> Option<&CollectionNode> {
        match self.get(iri)? {
            HypermediaNode::Collection(node) => Some(node),
            _ => None,
        }
    }

    /// Looks up a partial collection view.
    #[must_use]
    pub fn view(&self, iri: &str) -> Option<&PartialCollectionView> {
        match self.get(iri)? {
            HypermediaNode::PartialCollectionView(node) => Some(node),
            _ => None,
        }
    }

    /// The documentation root, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<&ApiDocumentation> {
        self.nodes.values().find_map(|node| match node {
            HypermediaNode::ApiDocumentation(root) => Some(root),
            _ => None,
        })
    }

    /// Operation nodes in insertion order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationNode> {
        self.nodes.values().filter_map(|node| match node {
            HypermediaNode::Operation(operation) => Some(operation),
            _ => None,
        })
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &HypermediaNode> {
        self.nodes.values()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders the graph as a JSON-LD document with an `@graph` array.
    #[must_use]
    pub fn to_json_ld(&self) -> Value {
        json!({
            "@context": vocab::context(),
            "@graph": self.nodes.values().map(HypermediaNode::to_json_ld).collect::<Vec<_>>(),
        })
    }

    /// Serializes the JSON-LD document.
    pub fn to_json_ld_string(&self) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_ld())?)
    }
}
