//! Query result options.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::query::{PropertyType, StandardTypeSystem};
use crate::types::Result;

/// Where null sort keys land relative to non-null ones in ascending order.
///
/// Descending orderings reverse the whole comparison, nulls included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullOrdering {
    /// Nulls before every value.
    #[default]
    First,
    /// Nulls after every value.
    Last,
}

/// Options applied when building schemata and sorting result tuples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    /// Placement of null sort keys.
    pub nulls: NullOrdering,
    /// Type assigned to schemata columns declared without a known type.
    pub default_column_type: PropertyType,
}

impl QueryConfig {
    /// Parses options from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Sets null placement.
    pub fn nulls(mut self, nulls: NullOrdering) -> Self {
        self.nulls = nulls;
        self
    }

    /// Sets the fallback column type.
    pub fn default_column_type(mut self, ty: PropertyType) -> Self {
        self.default_column_type = ty;
        self
    }

    /// Built-in type system honoring these options.
    pub fn type_system(&self) -> StandardTypeSystem {
        StandardTypeSystem::new().with_default_type(self.default_column_type)
    }
}
