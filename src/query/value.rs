//! Scalar values stored in result tuple slots.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Location, Name, Path};

/// Typed value tagged with explicit type information.
///
/// Tuple slots hold projected property values, node [`Location`]s, and
/// relevance scores (as [`Value::Double`]) side by side; the owning
/// [`super::Columns`] descriptor says which slot holds which.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Value {
    /// Missing or null value.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Signed 64-bit integer literal.
    Long(i64),
    /// 64-bit floating point literal.
    Double(f64),
    /// UTF-8 string literal.
    String(String),
    /// Arbitrary binary payload.
    Binary(Vec<u8>),
    /// Milliseconds since Unix epoch in UTC.
    Date(i64),
    /// Qualified name.
    Name(Name),
    /// Repository path.
    Path(Path),
    /// Identity of a matched node.
    Location(Location),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrows the location held in a location slot.
    pub fn as_location(&self) -> Option<&Location> {
        match self {
            Value::Location(location) => Some(location),
            _ => None,
        }
    }

    /// Numeric view used for scores and numeric coercion.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Long(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::Date(v) => Some(*v as f64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Length of the value: bytes for binaries, characters of the string form
    /// for everything else. `None` for nulls.
    pub fn length(&self) -> Option<i64> {
        let len = match self {
            Value::Null => return None,
            Value::Binary(bytes) => bytes.len(),
            Value::String(s) => s.chars().count(),
            other => other.to_string().chars().count(),
        };
        Some(len as i64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Binary(v) => write!(f, "<{} bytes>", v.len()),
            Value::Date(v) => write!(f, "{v}"),
            Value::Name(v) => write!(f, "{v}"),
            Value::Path(v) => write!(f, "{v}"),
            Value::Location(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(value)
    }
}

impl From<Location> for Value {
    fn from(value: Location) -> Self {
        Value::Location(value)
    }
}

impl From<Path> for Value {
    fn from(value: Path) -> Self {
        Value::Path(value)
    }
}

impl From<Name> for Value {
    fn from(value: Name) -> Self {
        Value::Name(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
