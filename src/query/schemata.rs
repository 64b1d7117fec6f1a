//! Frozen registry of the columns each selector exposes and their declared types.
//!
//! Projected and ordered columns are validated against a [`Schemata`] before any
//! tuple is produced, so a reference to an undeclared column surfaces as an
//! authoring error instead of a silent mis-comparison at sort time.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::warn;

use super::{PropertyType, SelectorName, TypeSystem};
use crate::types::{QuiverError, Result};

/// A declared column of one selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaColumn {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub ty: PropertyType,
}

/// Columns declared for one selector, in registration order.
#[derive(Clone, Debug)]
pub struct Table {
    name: SelectorName,
    columns: Vec<SchemaColumn>,
    by_name: FxHashMap<String, usize>,
}

impl Table {
    fn new(name: SelectorName) -> Self {
        Self {
            name,
            columns: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    fn upsert(&mut self, name: String, ty: PropertyType) {
        match self.by_name.get(&name) {
            Some(&idx) => self.columns[idx].ty = ty,
            None => {
                self.by_name.insert(name.clone(), self.columns.len());
                self.columns.push(SchemaColumn { name, ty });
            }
        }
    }

    /// Selector this table describes.
    pub fn name(&self) -> &SelectorName {
        &self.name
    }

    /// Declared columns in registration order.
    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&SchemaColumn> {
        self.by_name.get(name).map(|&idx| &self.columns[idx])
    }
}

/// Immutable selector → column → type registry.
#[derive(Clone, Debug)]
pub struct Schemata {
    tables: FxHashMap<SelectorName, Table>,
    order: Vec<SelectorName>,
}

impl Schemata {
    /// Starts a builder that resolves type names through `types`.
    pub fn builder(types: Arc<dyn TypeSystem>) -> SchemataBuilder {
        SchemataBuilder::new(types)
    }

    /// Declared type of `column` on `selector`.
    pub fn lookup(&self, selector: &SelectorName, column: &str) -> Result<PropertyType> {
        self.tables
            .get(selector)
            .and_then(|table| table.column(column))
            .map(|col| col.ty)
            .ok_or_else(|| QuiverError::UnknownColumn {
                selector: selector.to_string(),
                column: column.to_owned(),
            })
    }

    /// Table registered for `selector`.
    pub fn table(&self, selector: &SelectorName) -> Option<&Table> {
        self.tables.get(selector)
    }

    /// Selectors in registration order.
    pub fn selector_names(&self) -> &[SelectorName] {
        &self.order
    }
}

/// Single-owner builder for [`Schemata`].
///
/// Mirrors the query builder: the first invalid call is remembered and
/// reported by [`SchemataBuilder::build`], later calls are ignored.
pub struct SchemataBuilder {
    types: Arc<dyn TypeSystem>,
    tables: FxHashMap<SelectorName, Table>,
    order: Vec<SelectorName>,
    error: Option<QuiverError>,
}

impl SchemataBuilder {
    fn new(types: Arc<dyn TypeSystem>) -> Self {
        Self {
            types,
            tables: FxHashMap::default(),
            order: Vec::new(),
            error: None,
        }
    }

    /// Registers `column` on `selector` with the named type.
    ///
    /// An empty or unknown type name falls back to the type system's default
    /// type. Registering the same column again replaces its type.
    pub fn add_column(
        mut self,
        selector: impl Into<SelectorName>,
        column: impl Into<String>,
        type_name: &str,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        let selector = selector.into();
        let column = column.into();
        if selector.as_str().is_empty() || column.is_empty() {
            self.error = Some(QuiverError::invalid(
                "schemata columns require a selector and a column name",
            ));
            return self;
        }
        let ty = self.resolve_type(&selector, &column, type_name);
        self.table_mut(selector).upsert(column, ty);
        self
    }

    /// Registers `columns` on `selector` with the default type.
    pub fn add_table<I, S>(mut self, selector: impl Into<SelectorName>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selector = selector.into();
        for column in columns {
            self = self.add_column(selector.clone(), column, "");
        }
        self
    }

    /// Freezes the registry.
    pub fn build(self) -> Result<Schemata> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Schemata {
            tables: self.tables,
            order: self.order,
        })
    }

    fn resolve_type(&self, selector: &SelectorName, column: &str, type_name: &str) -> PropertyType {
        if type_name.trim().is_empty() {
            return self.types.default_type();
        }
        match self.types.type_named(type_name) {
            Some(ty) => ty,
            None => {
                let fallback = self.types.default_type();
                warn!(
                    %selector,
                    column,
                    type_name,
                    %fallback,
                    "schemata.column.unknown_type"
                );
                fallback
            }
        }
    }

    fn table_mut(&mut self, selector: SelectorName) -> &mut Table {
        let order = &mut self.order;
        self.tables.entry(selector.clone()).or_insert_with(|| {
            order.push(selector.clone());
            Table::new(selector)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::StandardTypeSystem;

    fn types() -> Arc<dyn TypeSystem> {
        Arc::new(StandardTypeSystem::new())
    }

    #[test]
    fn lookup_returns_declared_types() -> Result<()> {
        let schemata = Schemata::builder(types())
            .add_column("a", "title", "STRING")
            .add_column("a", "rank", "long")
            .add_column("b", "when", "DATE")
            .build()?;
        let a = SelectorName::from("a");
        assert_eq!(schemata.lookup(&a, "rank")?, PropertyType::Long);
        assert_eq!(schemata.lookup(&"b".into(), "when")?, PropertyType::Date);
        assert_eq!(schemata.selector_names(), &[a.clone(), "b".into()]);
        let names: Vec<&str> = schemata
            .table(&a)
            .map(|t| t.columns().iter().map(|c| c.name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["title", "rank"]);
        Ok(())
    }

    #[test]
    fn unknown_and_missing_types_default_to_string() -> Result<()> {
        let schemata = Schemata::builder(types())
            .add_column("a", "x", "")
            .add_column("a", "y", "NOT_A_TYPE")
            .add_table("b", ["z"])
            .build()?;
        assert_eq!(schemata.lookup(&"a".into(), "x")?, PropertyType::String);
        assert_eq!(schemata.lookup(&"a".into(), "y")?, PropertyType::String);
        assert_eq!(schemata.lookup(&"b".into(), "z")?, PropertyType::String);
        Ok(())
    }

    #[test]
    fn lookup_of_unregistered_column_fails() -> Result<()> {
        let schemata = Schemata::builder(types()).add_column("a", "x", "LONG").build()?;
        let err = schemata.lookup(&"a".into(), "nope").unwrap_err();
        assert!(matches!(err, QuiverError::UnknownColumn { .. }));
        let err = schemata.lookup(&"zz".into(), "x").unwrap_err();
        assert_eq!(err.code(), "InvalidArgument");
        Ok(())
    }

    #[test]
    fn re_registering_replaces_type() -> Result<()> {
        let schemata = Schemata::builder(types())
            .add_column("a", "x", "LONG")
            .add_column("a", "x", "DOUBLE")
            .build()?;
        assert_eq!(schemata.lookup(&"a".into(), "x")?, PropertyType::Double);
        assert_eq!(schemata.table(&"a".into()).map(|t| t.columns().len()), Some(1));
        Ok(())
    }

    #[test]
    fn empty_names_fail_the_build() {
        let err = Schemata::builder(types())
            .add_column("", "x", "LONG")
            .add_column("a", "y", "LONG")
            .build()
            .unwrap_err();
        assert!(matches!(err, QuiverError::InvalidArgument(_)));
    }
}
