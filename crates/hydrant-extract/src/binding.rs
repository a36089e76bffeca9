//! Resolved argument and result bindings.

use hydrant_core::{ArgumentSource, ParameterInfo, ParameterRole, ResultTarget, TypeShape};
use serde_json::Value;

/// A parameter together with the request part it is read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentBinding {
    parameter: ParameterInfo,
    source: ArgumentSource,
}

impl ArgumentBinding {
    /// Creates a binding.
    #[must_use]
    pub fn new(parameter: ParameterInfo, source: ArgumentSource) -> Self {
        Self { parameter, source }
    }

    /// The bound parameter.
    #[must_use]
    pub const fn parameter(&self) -> &ParameterInfo {
        &self.parameter
    }

    /// Where the value comes from.
    #[must_use]
    pub const fn source(&self) -> ArgumentSource {
        self.source
    }

    /// Parameter name, the key under which controllers read the value.
    #[must_use]
    pub fn name(&self) -> &str {
        self.parameter.name()
    }

    /// Name in the URL template, query string or header.
    #[must_use]
    pub fn variable(&self) -> &str {
        self.parameter.variable_name()
    }

    /// Declared shape.
    #[must_use]
    pub const fn shape(&self) -> &TypeShape {
        self.parameter.shape()
    }

    /// Default value, if any.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.parameter.default()
    }

    /// Paging role, if any.
    #[must_use]
    pub const fn role(&self) -> Option<ParameterRole> {
        self.parameter.paging_role()
    }
}

/// A secondary (out) value and its target.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBinding {
    parameter: ParameterInfo,
    target: ResultTarget,
}

impl OutputBinding {
    /// Creates an output binding.
    #[must_use]
    pub fn new(parameter: ParameterInfo, target: ResultTarget) -> Self {
        Self { parameter, target }
    }

    /// The out parameter.
    #[must_use]
    pub const fn parameter(&self) -> &ParameterInfo {
        &self.parameter
    }

    /// Where the value is written.
    #[must_use]
    pub const fn target(&self) -> &ResultTarget {
        &self.target
    }
}

/// Targets of the primary result and every out value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBinding {
    shape: TypeShape,
    target: ResultTarget,
    outputs: Vec<OutputBinding>,
}

impl ResultBinding {
    /// Creates a result binding.
    #[must_use]
    pub fn new(shape: TypeShape, target: ResultTarget, outputs: Vec<OutputBinding>) -> Self {
        Self {
            shape,
            target,
            outputs,
        }
    }

    /// Shape of the primary result.
    #[must_use]
    pub const fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Target of the primary result.
    #[must_use]
    pub const fn target(&self) -> &ResultTarget {
        &self.target
    }

    /// Out value bindings in declaration order.
    #[must_use]
    pub fn outputs(&self) -> &[OutputBinding] {
        &self.outputs
    }

    /// Whether the primary result is written to the body.
    #[must_use]
    pub fn writes_body(&self) -> bool {
        self.target == ResultTarget::Body && self.shape != TypeShape::Unit
    }
}
