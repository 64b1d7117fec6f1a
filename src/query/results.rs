//! Materialized query results.

use std::sync::Arc;

use super::{Columns, SelectorName, Tuple, TupleSorter, Value};
use crate::types::Location;

/// Tuples produced by one query execution, all laid out by one [`Columns`].
#[derive(Clone, Debug)]
pub struct QueryResults {
    columns: Arc<Columns>,
    tuples: Vec<Tuple>,
}

impl QueryResults {
    /// Wraps tuples produced against `columns`.
    pub fn new(columns: Arc<Columns>, tuples: Vec<Tuple>) -> Self {
        Self { columns, tuples }
    }

    /// Layout shared by every tuple.
    pub fn columns(&self) -> &Arc<Columns> {
        &self.columns
    }

    /// Raw tuples in current order.
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.tuples.len()
    }

    /// Returns true when the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Row views in current order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> + '_ {
        self.tuples.iter().map(move |tuple| Row {
            columns: &self.columns,
            tuple,
        })
    }

    /// Sorts rows with a sorter bound against this result's layout.
    pub fn sort_by(&mut self, sorter: &TupleSorter) {
        sorter.sort(&mut self.tuples);
    }

    /// Consumes the results, returning the tuples.
    pub fn into_tuples(self) -> Vec<Tuple> {
        self.tuples
    }
}

/// Named access to one tuple.
#[derive(Clone, Copy, Debug)]
pub struct Row<'r> {
    columns: &'r Columns,
    tuple: &'r Tuple,
}

impl<'r> Row<'r> {
    /// Value of the column exposed as `alias`.
    pub fn value(&self, alias: &str) -> Option<&'r Value> {
        self.columns.value(self.tuple, alias)
    }

    /// Location of `selector`'s node.
    pub fn location(&self, selector: &SelectorName) -> Option<&'r Location> {
        self.columns.location(self.tuple, selector)
    }

    /// Relevance score of `selector`'s node.
    pub fn score(&self, selector: &SelectorName) -> Option<f64> {
        self.columns.score(self.tuple, selector)
    }

    /// Underlying tuple.
    pub fn tuple(&self) -> &'r Tuple {
        self.tuple
    }
}
