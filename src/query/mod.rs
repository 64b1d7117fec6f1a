#![forbid(unsafe_code)]

//! Query result materialization.
//!
//! This module defines the contracts between a query planner and the
//! execution stages that produce and order result rows: the declared-type
//! registry, the positional tuple layout, and the ordering operands bound
//! against that layout.

/// Result tuple layout and tuple slot access.
///
/// Fixes where projected values, node locations, and relevance scores live in
/// every result row of one execution.
pub mod columns;

/// Selectors, projected columns, operands, and orderings.
pub mod model;

/// Materialized result sets with named row access.
pub mod results;

/// Declared column types per selector.
pub mod schemata;

/// Stable multi-key tuple sorting.
pub mod sort;

/// Declared property types and value comparison.
pub mod typesystem;

mod value;

pub use columns::{Columns, Tuple, NEUTRAL_SCORE};
pub use model::{Column, Operand, Order, Ordering, SelectorName};
pub use results::{QueryResults, Row};
pub use schemata::{SchemaColumn, Schemata, SchemataBuilder, Table};
pub use sort::TupleSorter;
pub use typesystem::{PropertyType, StandardTypeSystem, TypeSystem};
pub use value::Value;
