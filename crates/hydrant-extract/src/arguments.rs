//! Bound argument values handed to controllers.

use hydrant_core::{ClaimIdentity, HydrantResult};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::BindingError;

/// The bound arguments of one invocation, keyed by parameter name.
///
/// Values are kept in their neutral JSON form until a controller asks for a
/// typed view with [`Arguments::get`].
///
/// # Example
///
/// ```rust
/// use hydrant_extract::Arguments;
/// use serde_json::json;
///
/// let mut args = Arguments::default();
/// args.insert("id", json!(42));
///
/// let id: i64 = args.get("id").unwrap();
/// let missing: Option<String> = args.get("name").unwrap();
///
/// assert_eq!(id, 42);
/// assert_eq!(missing, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, Value>,
    identity: ClaimIdentity,
}

impl Arguments {
    /// Creates an empty argument set for the given caller.
    #[must_use]
    pub fn new(identity: ClaimIdentity) -> Self {
        Self {
            values: IndexMap::new(),
            identity,
        }
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Returns the raw value of an argument.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Deserializes an argument into `T`.
    ///
    /// A missing argument is read as `null`, so `Option<T>` yields `None`.
    ///
    /// # Errors
    ///
    /// Returns a bad request error when the value does not fit `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> HydrantResult<T> {
        let value = self.values.get(name).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| BindingError::deserialization_failed(name, e.to_string()).into())
    }

    /// Returns the caller's identity.
    #[must_use]
    pub const fn identity(&self) -> &ClaimIdentity {
        &self.identity
    }

    /// Number of bound values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over values in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
