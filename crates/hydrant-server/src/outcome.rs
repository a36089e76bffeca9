//! Controller results.

use http::{HeaderMap, HeaderName, HeaderValue};
use hydrant_core::{HydrantError, HydrantResult, TypeShape};
use serde::Serialize;
use serde_json::Value;

/// What a controller method produced.
///
/// The primary value and the out values stay in neutral JSON form; the
/// dispatcher maps them onto the body and headers as the operation's
/// result binding says.
///
/// # Example
///
/// ```rust
/// use hydrant_server::Outcome;
/// use serde_json::json;
///
/// let outcome = Outcome::of(&vec!["a", "b"]).unwrap().with_output(json!(10));
///
/// assert_eq!(outcome.value(), &json!(["a", "b"]));
/// assert_eq!(outcome.outputs(), &[json!(10)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    value: Value,
    outputs: Vec<Value>,
    shape: Option<TypeShape>,
    media_type: Option<String>,
    headers: HeaderMap,
}

impl Outcome {
    /// An outcome without a value.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps an already neutral value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Serializes a controller value.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> HydrantResult<Self> {
        serde_json::to_value(value)
            .map(Self::from_value)
            .map_err(|e| HydrantError::internal_with_source("result is not serializable", e))
    }

    /// Appends an out value.
    #[must_use]
    pub fn with_output(mut self, value: Value) -> Self {
        self.outputs.push(value);
        self
    }

    /// Replaces the shape the value is written as.
    #[must_use]
    pub fn with_shape(mut self, shape: TypeShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Forces the media type instead of negotiating one.
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Adds a response header. Headers added here win over the ones the
    /// dispatcher derives.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The primary value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Replaces the primary value.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Out values in declaration order.
    #[must_use]
    pub fn outputs(&self) -> &[Value] {
        &self.outputs
    }

    /// The shape override, if any.
    #[must_use]
    pub const fn shape(&self) -> Option<&TypeShape> {
        self.shape.as_ref()
    }

    /// The forced media type, if any.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Extra response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
