//! # Hydrant Convert
//!
//! Body converters and content negotiation.
//!
//! A [`ConverterRegistry`] holds [`Converter`]s in registration order and
//! ranks them against a request with an ordered [`CompatibilityLevel`]:
//! a converter that supports the shape is a `TypeMatch`, one whose media
//! type is also named by `Content-Type` / `Accept` is an `ExactMatch`.
//!
//! Shipped converters:
//!
//! | Converter | Media type | Inbound | Outbound |
//! |---|---|---|---|
//! | [`JsonConverter`] | `application/json` | all shapes | all shapes |
//! | [`PlainTextConverter`] | `text/plain` | scalars | scalars |
//! | [`FormUrlEncodedConverter`] | `application/x-www-form-urlencoded` | objects | none |
//!
//! A `multipart/mixed` body is split into [`BodyPart`]s by
//! [`multipart::read_parts`]; every part is then read by the converter its
//! own `Content-Type` selects.

#![doc(html_root_url = "https://docs.rs/hydrant-convert/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod converter;
mod error;
mod form;
mod json;
mod level;
pub mod media;
pub mod multipart;
mod registry;
mod scalar;
mod text;

pub use converter::Converter;
pub use error::{ConversionError, NegotiationError};
pub use form::{FormUrlEncodedConverter, FORM_URLENCODED};
pub use json::{JsonConverter, APPLICATION_JSON};
pub use level::CompatibilityLevel;
pub use multipart::{BodyPart, MULTIPART_MIXED};
pub use registry::{ConverterRegistry, Written};
pub use scalar::{format_scalar, parse_scalar};
pub use text::{PlainTextConverter, TEXT_PLAIN};
