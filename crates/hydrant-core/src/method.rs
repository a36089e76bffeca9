//! Declared controller method metadata.
//!
//! A [`MethodInfo`] is the explicit replacement for reflecting over a
//! controller method: it names the method, lists its parameters (with
//! optional source annotations) and declares the return shape. The
//! descriptor builder derives routes, verbs and bindings from it.
//!
//! # Example
//!
//! ```
//! use hydrant_core::{Capability, MethodInfo, ParameterInfo, TypeShape};
//! use http::Method;
//!
//! let info = MethodInfo::new("get_by_name")
//!     .param(ParameterInfo::new::<String>("name"))
//!     .returns_shape(TypeShape::object("Product"));
//!
//! assert_eq!(info.name(), "get_by_name");
//! assert_eq!(info.inputs().count(), 1);
//! assert_eq!(Capability::Create.default_verb(), Method::POST);
//! ```

use http::{HeaderName, Method};
use serde_json::Value;
use std::fmt;

use crate::shape::{Shaped, TypeShape};

/// Where an argument value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentSource {
    /// A `{name}` segment of the URL path.
    Url,
    /// A query string parameter.
    QueryString,
    /// A request header.
    Header,
    /// The request body.
    Body,
    /// Supplied by the framework (e.g. the caller identity), not the request.
    Neutral,
}

impl fmt::Display for ArgumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Url => "url",
            Self::QueryString => "query",
            Self::Header => "header",
            Self::Body => "body",
            Self::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// Where a result value is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultTarget {
    /// The response body.
    Body,
    /// A response header.
    Header(HeaderName),
}

impl ResultTarget {
    /// Returns the header name when targeting a header.
    #[must_use]
    pub const fn header(&self) -> Option<&HeaderName> {
        match self {
            Self::Header(name) => Some(name),
            Self::Body => None,
        }
    }
}

/// Conventional members a controller can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Enumerate entities, optionally paged and filtered.
    List,
    /// Fetch one entity by key.
    Get,
    /// Create an entity and return its key.
    Create,
    /// Replace an entity.
    Update,
    /// Remove an entity.
    Delete,
}

impl Capability {
    /// The verb a capability member is exposed under.
    #[must_use]
    pub const fn default_verb(&self) -> Method {
        match self {
            Self::List | Self::Get => Method::GET,
            Self::Create => Method::POST,
            Self::Update => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    /// Create, update and delete modify state.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

/// How a method entered the controller definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MethodOrigin {
    /// Declared directly by the controller.
    #[default]
    Inherent,
    /// Registered as the member of a capability.
    Capability(Capability),
}

impl MethodOrigin {
    /// Returns the capability, if any.
    #[must_use]
    pub const fn capability(&self) -> Option<Capability> {
        match self {
            Self::Capability(c) => Some(*c),
            Self::Inherent => None,
        }
    }
}

/// Paging and filtering conventions of list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterRole {
    /// Number of entities to skip (`$skip`).
    Skip,
    /// Maximum number of entities, `0` meaning unbounded (`$top`).
    Take,
    /// Filter expression (`$filter`).
    Filter,
    /// Full item count, reported as an out value.
    TotalItems,
}

/// Metadata of one method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    name: String,
    shape: TypeShape,
    position: usize,
    optional: bool,
    source: Option<ArgumentSource>,
    variable: Option<String>,
    url_fragment: Option<String>,
    default: Option<Value>,
    is_out: bool,
    role: Option<ParameterRole>,
}

impl ParameterInfo {
    /// Creates a parameter whose shape follows the Rust type `T`.
    #[must_use]
    pub fn new<T: Shaped>(name: impl Into<String>) -> Self {
        let mut param = Self::with_shape(name, T::shape());
        param.optional = T::is_optional();
        param
    }

    /// Creates a parameter with an explicit shape.
    #[must_use]
    pub fn with_shape(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            position: 0,
            optional: false,
            source: None,
            variable: None,
            url_fragment: None,
            default: None,
            is_out: false,
            role: None,
        }
    }

    /// Creates an out parameter (a secondary result value).
    #[must_use]
    pub fn out<T: Shaped>(name: impl Into<String>) -> Self {
        let mut param = Self::new::<T>(name);
        param.is_out = true;
        param
    }

    /// Forces the parameter into the URL path.
    #[must_use]
    pub fn from_url(mut self) -> Self {
        self.source = Some(ArgumentSource::Url);
        self
    }

    /// Forces the parameter into the URL path with an explicit fragment,
    /// e.g. `/by-name/{name}`.
    #[must_use]
    pub fn from_url_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.source = Some(ArgumentSource::Url);
        self.url_fragment = Some(fragment.into());
        self
    }

    /// Forces the parameter into the query string.
    #[must_use]
    pub fn from_query(mut self) -> Self {
        self.source = Some(ArgumentSource::QueryString);
        self
    }

    /// Reads the parameter from the named header.
    #[must_use]
    pub fn from_header(mut self, header: impl Into<String>) -> Self {
        self.source = Some(ArgumentSource::Header);
        self.variable = Some(header.into());
        self
    }

    /// Forces the parameter into the body.
    #[must_use]
    pub fn from_body(mut self) -> Self {
        self.source = Some(ArgumentSource::Body);
        self
    }

    /// Marks the parameter as framework-supplied.
    #[must_use]
    pub fn neutral(mut self) -> Self {
        self.source = Some(ArgumentSource::Neutral);
        self
    }

    /// Overrides the name the parameter is bound by in the request.
    #[must_use]
    pub fn variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    /// Value used when the request carries none.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the parameter as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Assigns a paging role.
    #[must_use]
    pub fn role(mut self, role: ParameterRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared shape.
    #[must_use]
    pub const fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Zero-based declaration position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Whether the parameter may be absent.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether this is an out parameter.
    #[must_use]
    pub const fn is_out(&self) -> bool {
        self.is_out
    }

    /// Paging role, if any.
    #[must_use]
    pub const fn paging_role(&self) -> Option<ParameterRole> {
        self.role
    }

    /// Default value, if any.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The explicitly annotated source, if any.
    #[must_use]
    pub const fn explicit_source(&self) -> Option<ArgumentSource> {
        self.source
    }

    /// Explicit URL fragment, if any.
    #[must_use]
    pub fn url_fragment(&self) -> Option<&str> {
        self.url_fragment.as_deref()
    }

    /// The name the parameter is bound by in the request.
    #[must_use]
    pub fn variable_name(&self) -> &str {
        self.variable.as_deref().unwrap_or(&self.name)
    }
}

/// Metadata of one controller method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    name: String,
    params: Vec<ParameterInfo>,
    returns: TypeShape,
    verbs: Vec<Method>,
    route: Option<String>,
    origin: MethodOrigin,
    result_target: Option<ResultTarget>,
}

impl MethodInfo {
    /// Creates metadata for a method returning nothing.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: TypeShape::Unit,
            verbs: Vec::new(),
            route: None,
            origin: MethodOrigin::Inherent,
            result_target: None,
        }
    }

    /// Appends a parameter, assigning its position.
    #[must_use]
    pub fn param(mut self, mut param: ParameterInfo) -> Self {
        param.position = self.params.len();
        self.params.push(param);
        self
    }

    /// Declares the return type.
    #[must_use]
    pub fn returns<T: Shaped>(self) -> Self {
        self.returns_shape(T::shape())
    }

    /// Declares the return shape.
    #[must_use]
    pub fn returns_shape(mut self, shape: TypeShape) -> Self {
        self.returns = shape;
        self
    }

    /// Adds an explicit verb. The first verb is the protocol-specific command.
    #[must_use]
    pub fn verb(mut self, verb: Method) -> Self {
        if !self.verbs.contains(&verb) {
            self.verbs.push(verb);
        }
        self
    }

    /// Sets an explicit route segment, relative to the controller route.
    #[must_use]
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Registers the method as the member of a capability.
    #[must_use]
    pub fn capability(mut self, capability: Capability) -> Self {
        self.origin = MethodOrigin::Capability(capability);
        self
    }

    /// Overrides the target of the primary result.
    #[must_use]
    pub fn result_target(mut self, target: ResultTarget) -> Self {
        self.result_target = Some(target);
        self
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParameterInfo] {
        &self.params
    }

    /// Parameters read from the request.
    pub fn inputs(&self) -> impl Iterator<Item = &ParameterInfo> {
        self.params.iter().filter(|p| !p.is_out())
    }

    /// Out parameters, i.e. secondary result values.
    pub fn outputs(&self) -> impl Iterator<Item = &ParameterInfo> {
        self.params.iter().filter(|p| p.is_out())
    }

    /// Declared return shape.
    #[must_use]
    pub const fn return_shape(&self) -> &TypeShape {
        &self.returns
    }

    /// Explicit verbs.
    #[must_use]
    pub fn verbs(&self) -> &[Method] {
        &self.verbs
    }

    /// Explicit route segment.
    #[must_use]
    pub fn explicit_route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Registration origin.
    #[must_use]
    pub const fn origin(&self) -> MethodOrigin {
        self.origin
    }

    /// Explicit result target override.
    #[must_use]
    pub const fn result_override(&self) -> Option<&ResultTarget> {
        self.result_target.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_declaration_order() {
        let info = MethodInfo::new("list")
            .param(ParameterInfo::out::<i64>("total_items"))
            .param(ParameterInfo::new::<i64>("skip"))
            .param(ParameterInfo::new::<i64>("take"));

        let positions: Vec<_> = info.params().iter().map(ParameterInfo::position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(info.inputs().count(), 2);
        assert_eq!(info.outputs().next().map(ParameterInfo::name), Some("total_items"));
    }

    #[test]
    fn test_parameter_annotations() {
        let param = ParameterInfo::new::<String>("name").from_url_fragment("/by-name/{name}");
        assert_eq!(param.explicit_source(), Some(ArgumentSource::Url));
        assert_eq!(param.url_fragment(), Some("/by-name/{name}"));

        let param = ParameterInfo::new::<String>("token").from_header("x-token");
        assert_eq!(param.explicit_source(), Some(ArgumentSource::Header));
        assert_eq!(param.variable_name(), "x-token");
    }

    #[test]
    fn test_variable_without_source() {
        let param = ParameterInfo::new::<i64>("skip").variable("$skip");
        assert_eq!(param.explicit_source(), None);
        assert_eq!(param.variable_name(), "$skip");
        assert_eq!(param.name(), "skip");
    }

    #[test]
    fn test_optional_follows_type() {
        assert!(ParameterInfo::new::<Option<i64>>("limit").is_optional());
        assert!(!ParameterInfo::new::<i64>("limit").is_optional());
        assert!(ParameterInfo::new::<i64>("limit").optional().is_optional());
    }

    #[test]
    fn test_default_value() {
        let param = ParameterInfo::new::<i64>("take").default_value(0);
        assert_eq!(param.default(), Some(&Value::from(0)));
    }

    #[test]
    fn test_verbs_are_deduplicated() {
        let info = MethodInfo::new("touch").verb(Method::PUT).verb(Method::PUT).verb(Method::POST);
        assert_eq!(info.verbs(), &[Method::PUT, Method::POST]);
    }

    #[test]
    fn test_capability_origin() {
        let info = MethodInfo::new("create").capability(Capability::Create);
        assert_eq!(info.origin(), MethodOrigin::Capability(Capability::Create));
        assert_eq!(info.origin().capability(), Some(Capability::Create));
        assert_eq!(MethodInfo::new("create").origin().capability(), None);
    }

    #[test]
    fn test_capability_verbs() {
        assert_eq!(Capability::List.default_verb(), Method::GET);
        assert_eq!(Capability::Get.default_verb(), Method::GET);
        assert_eq!(Capability::Update.default_verb(), Method::PUT);
        assert_eq!(Capability::Delete.default_verb(), Method::DELETE);
        assert!(Capability::Delete.is_write());
        assert!(!Capability::List.is_write());
    }

    #[test]
    fn test_result_target_override() {
        let info = MethodInfo::new("touch")
            .result_target(ResultTarget::Header(http::header::ETAG));
        assert_eq!(
            info.result_override().and_then(ResultTarget::header),
            Some(&http::header::ETAG)
        );
    }
}
