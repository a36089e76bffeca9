//! Vocabulary IRIs and the shape-to-class mapping.

use hydrant_core::TypeShape;
use serde_json::{json, Value};

/// Hydra core vocabulary.
pub const HYDRA: &str = "http://www.w3.org/ns/hydra/core#";

/// RDF Schema vocabulary.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// XML Schema datatypes.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// The `@context` shared by every emitted document.
#[must_use]
pub fn context() -> Value {
    json!({
        "hydra": HYDRA,
        "rdfs": RDFS,
        "xsd": XSD,
    })
}

/// IRI of a class defined by the described API.
#[must_use]
pub fn class_iri(base_iri: &str, class: &str) -> String {
    format!("{}#{}", base_iri.trim_end_matches('/'), class)
}

/// IRI of the class describing values of `shape`, `None` for shapes that
/// carry no payload.
#[must_use]
pub fn shape_iri(shape: &TypeShape, base_iri: &str) -> Option<String> {
    let compact = match shape {
        TypeShape::Unit | TypeShape::Principal => return None,
        TypeShape::Object(name) | TypeShape::Identity(name) => {
            return Some(class_iri(base_iri, name))
        }
        TypeShape::Bool => "xsd:boolean",
        TypeShape::Integer => "xsd:long",
        TypeShape::Float => "xsd:double",
        TypeShape::String | TypeShape::Uuid | TypeShape::Filter => "xsd:string",
        TypeShape::Timestamp => "xsd:dateTime",
        TypeShape::Sequence(_) => "hydra:Collection",
        TypeShape::Graph => "hydra:ApiDocumentation",
    };
    Some(compact.to_string())
}

/// Class names introduced by `shape`: objects and tagged identities,
/// looking through sequences.
#[must_use]
pub fn defined_class(shape: &TypeShape) -> Option<&str> {
    match shape {
        TypeShape::Object(name) | TypeShape::Identity(name) => Some(name),
        TypeShape::Sequence(item) => defined_class(item),
        _ => None,
    }
}
