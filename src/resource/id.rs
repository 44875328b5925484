//! Entity identifiers.

use std::fmt;

use serde_json::Value;

/// The identifier of a remote entity.
///
/// The platform uses numeric ids almost everywhere, but ids are only ever
/// used to build URLs, so they are kept as text. Numbers, strings and other
/// ids convert into an `EntityId`.
///
/// ```rust
/// use threescale::EntityId;
///
/// let id = EntityId::from(42u64);
/// assert_eq!(id.as_str(), "42");
/// assert_eq!(id.to_json(), serde_json::json!(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an id from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reads an id from a JSON value (number or non-empty string).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    /// Returns the textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id as JSON: a number when it is numeric, a string otherwise.
    pub fn to_json(&self) -> Value {
        match self.0.parse::<u64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(self.0.clone()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

macro_rules! id_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for EntityId {
                fn from(id: $ty) -> Self {
                    Self(id.to_string())
                }
            }
        )*
    };
}

id_from_integer!(u32, u64, i32, i64, usize);

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&EntityId> for EntityId {
    fn from(id: &EntityId) -> Self {
        id.clone()
    }
}
