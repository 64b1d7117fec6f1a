//! Declared property types and the type system that compares values of them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Value;
use crate::types::{Name, Path, QuiverError, Result};

/// Declared type of a schemata column.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    /// Text; the fallback for undeclared or unknown types.
    #[default]
    String,
    /// Raw bytes.
    Binary,
    /// 64-bit integer.
    Long,
    /// 64-bit float.
    Double,
    /// Decimal number, compared numerically.
    Decimal,
    /// Timestamp in milliseconds since epoch.
    Date,
    /// Boolean.
    Boolean,
    /// Qualified name.
    Name,
    /// Repository path.
    Path,
    /// Reference to another node, compared as text.
    Reference,
    /// URI, compared as text.
    Uri,
    /// Opaque value; not orderable.
    Object,
}

impl PropertyType {
    /// Every declared type, in declaration order.
    pub const ALL: [PropertyType; 12] = [
        PropertyType::String,
        PropertyType::Binary,
        PropertyType::Long,
        PropertyType::Double,
        PropertyType::Decimal,
        PropertyType::Date,
        PropertyType::Boolean,
        PropertyType::Name,
        PropertyType::Path,
        PropertyType::Reference,
        PropertyType::Uri,
        PropertyType::Object,
    ];

    /// Canonical upper-case type name.
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::String => "STRING",
            PropertyType::Binary => "BINARY",
            PropertyType::Long => "LONG",
            PropertyType::Double => "DOUBLE",
            PropertyType::Decimal => "DECIMAL",
            PropertyType::Date => "DATE",
            PropertyType::Boolean => "BOOLEAN",
            PropertyType::Name => "NAME",
            PropertyType::Path => "PATH",
            PropertyType::Reference => "REFERENCE",
            PropertyType::Uri => "URI",
            PropertyType::Object => "OBJECT",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyType {
    type Err = QuiverError;

    fn from_str(s: &str) -> Result<Self> {
        PropertyType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QuiverError::invalid(format!("unknown property type '{s}'")))
    }
}

/// Per-type comparison and coercion, supplied to schemata and sort binding.
pub trait TypeSystem: Send + Sync {
    /// Resolves a declared type name; `None` when the name is unknown.
    fn type_named(&self, name: &str) -> Option<PropertyType>;
    /// Type given to columns declared without a known type.
    fn default_type(&self) -> PropertyType;
    /// Returns true when values of `ty` can be used as sort keys.
    fn is_orderable(&self, ty: PropertyType) -> bool;
    /// Compares two non-null values as values of `ty`.
    fn compare(&self, ty: PropertyType, left: &Value, right: &Value) -> Ordering;
}

/// Type system covering the built-in [`PropertyType`]s.
///
/// Both values are coerced to the declared type before comparing. A value
/// that cannot be coerced sorts after every value that can; two such values
/// compare by their string forms.
///
/// LONG and DATE coercion truncates doubles toward zero, so `1.2` and `1.9`
/// are equal in a LONG column. Text-like types compare two binary values by
/// their bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardTypeSystem {
    default_type: PropertyType,
}

impl StandardTypeSystem {
    /// Creates a type system whose default type is STRING.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the type used for undeclared or unknown columns.
    pub fn with_default_type(mut self, ty: PropertyType) -> Self {
        self.default_type = ty;
        self
    }
}

impl TypeSystem for StandardTypeSystem {
    fn type_named(&self, name: &str) -> Option<PropertyType> {
        name.parse().ok()
    }

    fn default_type(&self) -> PropertyType {
        self.default_type
    }

    fn is_orderable(&self, ty: PropertyType) -> bool {
        ty != PropertyType::Object
    }

    fn compare(&self, ty: PropertyType, left: &Value, right: &Value) -> Ordering {
        match ty {
            PropertyType::Long | PropertyType::Date => {
                compare_coerced(left, right, to_i64, |a, b| a.cmp(b))
            }
            PropertyType::Double | PropertyType::Decimal => {
                compare_coerced(left, right, Value::as_f64, f64::total_cmp)
            }
            PropertyType::Boolean => compare_coerced(left, right, to_bool, |a, b| a.cmp(b)),
            PropertyType::Name => compare_coerced(left, right, to_name, |a, b| a.cmp(b)),
            PropertyType::Path => compare_coerced(left, right, to_path, |a, b| a.cmp(b)),
            PropertyType::Binary => compare_coerced(left, right, to_bytes, |a, b| a.cmp(b)),
            PropertyType::String
            | PropertyType::Reference
            | PropertyType::Uri
            | PropertyType::Object => compare_text(left, right),
        }
    }
}

fn compare_coerced<T>(
    left: &Value,
    right: &Value,
    coerce: impl Fn(&Value) -> Option<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (coerce(left), coerce(right)) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.to_string().cmp(&right.to_string()),
    }
}

fn compare_text(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Binary(a), Value::Binary(b)) => a.cmp(b),
        _ => left.to_string().cmp(&right.to_string()),
    }
}

fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Long(v) | Value::Date(v) => Some(*v),
        Value::Double(v) if v.is_finite() => Some(*v as i64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(v) => Some(*v),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_name(value: &Value) -> Option<Name> {
    match value {
        Value::Name(name) => Some(name.clone()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn to_path(value: &Value) -> Option<Path> {
    match value {
        Value::Path(path) => Some(path.clone()),
        Value::Location(location) => Some(location.path.clone()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn to_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Binary(bytes) => Some(bytes.clone()),
        Value::String(s) => Some(s.as_bytes().to_vec()),
        _ => None,
    }
}
