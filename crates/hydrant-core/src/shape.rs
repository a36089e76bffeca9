//! Declared shapes of parameters and return values.
//!
//! Rust has no runtime reflection, so controllers describe their
//! parameter and return types through a [`TypeShape`]. The [`Shaped`] trait
//! derives the shape from a Rust type for the common cases; domain types
//! implement it in one line.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::filter::FilterExpression;
use crate::identity::ClaimIdentity;
use crate::paging::Page;

/// Textual form of the Unix epoch used as the zero timestamp.
pub const EPOCH: &str = "1970-01-01T00:00:00Z";

/// The declared shape of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// No value.
    Unit,
    /// Boolean.
    Bool,
    /// Any integer type.
    Integer,
    /// Any floating point type.
    Float,
    /// Text.
    String,
    /// A UUID, always treated as an identifier.
    Uuid,
    /// A point in time, always treated as an identifier.
    Timestamp,
    /// A tagged identity type (e.g. a newtype around an integer key).
    Identity(String),
    /// An ordered collection.
    Sequence(Box<TypeShape>),
    /// A structured domain entity, named by its class.
    Object(String),
    /// A `$filter` expression.
    Filter,
    /// A semantic graph document.
    Graph,
    /// The caller identity.
    Principal,
}

impl TypeShape {
    /// Creates an object shape.
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self::Object(name.into())
    }

    /// Creates a sequence shape.
    #[must_use]
    pub fn sequence(item: Self) -> Self {
        Self::Sequence(Box::new(item))
    }

    /// Creates a tagged identity shape.
    #[must_use]
    pub fn identity(tag: impl Into<String>) -> Self {
        Self::Identity(tag.into())
    }

    /// Shapes that always denote an identifier.
    #[must_use]
    pub const fn is_intrinsic_identifier(&self) -> bool {
        matches!(self, Self::Uuid | Self::Timestamp)
    }

    /// Shapes that can act as an identifier when named like one.
    #[must_use]
    pub const fn is_identity_capable(&self) -> bool {
        matches!(self, Self::Integer | Self::Identity(_))
    }

    /// Integers and floats.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Shapes representable as a single textual token.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Integer
                | Self::Float
                | Self::String
                | Self::Uuid
                | Self::Timestamp
                | Self::Identity(_)
        )
    }

    /// Value shapes have a zero value; everything else is a reference.
    #[must_use]
    pub const fn is_value_shape(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Integer | Self::Float | Self::Uuid | Self::Timestamp | Self::Identity(_)
        )
    }

    /// Shapes that can only travel in a message body.
    ///
    /// Strings and sequences of numbers fit into URLs and query strings.
    #[must_use]
    pub fn is_body_shape(&self) -> bool {
        match self {
            Self::Object(_) | Self::Graph => true,
            Self::Sequence(item) => !item.is_numeric(),
            _ => false,
        }
    }

    /// Returns the item shape of a sequence.
    #[must_use]
    pub fn item(&self) -> Option<&Self> {
        match self {
            Self::Sequence(item) => Some(item),
            _ => None,
        }
    }

    /// Returns the zero value for this shape.
    ///
    /// Value shapes yield `0`, `0.0`, `false`, the nil UUID or the Unix
    /// epoch; reference shapes yield `null`.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Integer | Self::Identity(_) => Value::from(0),
            Self::Float => Value::from(0.0),
            Self::Uuid => Value::String(Uuid::nil().to_string()),
            Self::Timestamp => Value::String(EPOCH.to_string()),
            _ => Value::Null,
        }
    }

    /// Name of the class this shape documents as.
    #[must_use]
    pub fn class_name(&self) -> String {
        match self {
            Self::Sequence(item) => format!("{}[]", item.class_name()),
            Self::Object(name) | Self::Identity(name) => name.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "unit"),
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Uuid => write!(f, "uuid"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Identity(tag) => write!(f, "identity<{tag}>"),
            Self::Sequence(item) => write!(f, "sequence<{item}>"),
            Self::Object(name) => write!(f, "{name}"),
            Self::Filter => write!(f, "filter"),
            Self::Graph => write!(f, "graph"),
            Self::Principal => write!(f, "principal"),
        }
    }
}

/// Types with a statically known [`TypeShape`].
///
/// # Example
///
/// ```
/// use hydrant_core::{Shaped, TypeShape};
///
/// struct Product;
///
/// impl Shaped for Product {
///     fn shape() -> TypeShape {
///         TypeShape::object("Product")
///     }
/// }
///
/// assert_eq!(<Vec<Product>>::shape(), TypeShape::sequence(TypeShape::object("Product")));
/// assert!(<Option<i32>>::is_optional());
/// ```
pub trait Shaped {
    /// Returns the shape of this type.
    fn shape() -> TypeShape;

    /// Whether a missing value is acceptable.
    fn is_optional() -> bool {
        false
    }
}

macro_rules! impl_shaped {
    ($shape:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Shaped for $ty {
                fn shape() -> TypeShape {
                    $shape
                }
            }
        )+
    };
}

impl_shaped!(TypeShape::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_shaped!(TypeShape::Float => f32, f64);
impl_shaped!(TypeShape::Bool => bool);
impl_shaped!(TypeShape::String => String);
impl_shaped!(TypeShape::Uuid => Uuid);
impl_shaped!(TypeShape::Timestamp => DateTime<Utc>);
impl_shaped!(TypeShape::Unit => ());
impl_shaped!(TypeShape::Filter => FilterExpression);
impl_shaped!(TypeShape::Principal => ClaimIdentity);

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::sequence(T::shape())
    }
}

impl<T: Shaped> Shaped for Page<T> {
    fn shape() -> TypeShape {
        TypeShape::sequence(T::shape())
    }
}

impl<T: Shaped> Shaped for Option<T> {
    fn shape() -> TypeShape {
        T::shape()
    }

    fn is_optional() -> bool {
        true
    }
}
