//! Binds request data to resolved argument bindings.

use hydrant_convert::{parse_scalar, ConverterRegistry, NegotiationError};
use hydrant_core::{ArgumentSource, HydrantResult, TypeShape};
use serde_json::Value;
use tracing::trace;

use crate::arguments::Arguments;
use crate::binding::ArgumentBinding;
use crate::context::BindingContext;
use crate::error::BindingError;

/// Binds every argument of an operation.
///
/// Absent values fall back to the parameter's default, then to `null` for
/// optional parameters; anything else is a missing-value error. Textual
/// values are parsed against the declared shape. The body is read through
/// `converters`, which performs inbound negotiation.
///
/// With a multipart body the n-th body argument reads the n-th part, and a
/// missing part yields the shape's zero value. Several body arguments
/// require a multipart body.
///
/// # Errors
///
/// Returns a bad request error for missing or malformed values and an
/// unsupported media type error when no converter reads the body.
pub fn bind(
    bindings: &[ArgumentBinding],
    context: &BindingContext<'_>,
    converters: &ConverterRegistry,
) -> HydrantResult<Arguments> {
    let request = context.request();
    let bodies = bindings
        .iter()
        .filter(|binding| binding.source() == ArgumentSource::Body)
        .count();
    if bodies > 1 && context.parts().is_none() {
        return Err(NegotiationError::MultipartRequired {
            content_type: context.header("content-type").unwrap_or("none").to_string(),
            bodies,
        }
        .into());
    }

    let mut arguments = Arguments::new(request.identity().clone());
    let mut part = 0;
    for binding in bindings {
        let value = bind_one(binding, part, context, converters)?;
        if binding.source() == ArgumentSource::Body {
            part += 1;
        }
        trace!(argument = binding.name(), source = %binding.source(), "bound argument");
        arguments.insert(binding.name(), value);
    }

    Ok(arguments)
}

fn bind_one(
    binding: &ArgumentBinding,
    part: usize,
    context: &BindingContext<'_>,
    converters: &ConverterRegistry,
) -> HydrantResult<Value> {
    let source = binding.source();
    let variable = binding.variable();

    let raw = match source {
        ArgumentSource::Url => context.path_param(variable).map(str::to_string),
        ArgumentSource::QueryString => {
            let values = context.query_values(variable);
            match binding.shape() {
                TypeShape::Sequence(_) if !values.is_empty() => Some(values.join(",")),
                _ => values.last().map(|v| (*v).to_string()),
            }
        }
        ArgumentSource::Header => context.header(variable).map(str::to_string),
        ArgumentSource::Body => return read_body(binding, part, context, converters),
        ArgumentSource::Neutral => {
            if *binding.shape() == TypeShape::Principal {
                return serde_json::to_value(context.request().identity()).map_err(|e| {
                    BindingError::invalid_value(source, binding.name(), e.to_string()).into()
                });
            }
            None
        }
    };

    match raw {
        Some(text) if !is_blank_for(binding.shape(), &text) => parse_scalar(binding.shape(), &text)
            .map_err(|details| BindingError::invalid_value(source, variable, details).into()),
        _ => absent(binding),
    }
}

fn read_body(
    binding: &ArgumentBinding,
    part: usize,
    context: &BindingContext<'_>,
    converters: &ConverterRegistry,
) -> HydrantResult<Value> {
    match context.parts() {
        Some(parts) => match parts.get(part) {
            Some(part) => converters.read(binding.shape(), &part.to_request(context.request())),
            None => Ok(binding.shape().zero_value()),
        },
        None => converters.read(binding.shape(), context.request()),
    }
}

fn is_blank_for(shape: &TypeShape, text: &str) -> bool {
    text.is_empty() && *shape != TypeShape::String
}

fn absent(binding: &ArgumentBinding) -> HydrantResult<Value> {
    if let Some(default) = binding.default() {
        return Ok(default.clone());
    }
    if binding.parameter().is_optional() {
        return Ok(Value::Null);
    }
    Err(BindingError::missing(binding.source(), binding.variable()).into())
}
