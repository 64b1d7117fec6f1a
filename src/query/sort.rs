//! Ordering of result tuples.
//!
//! [`TupleSorter::bind`] validates a list of [`Ordering`]s against a
//! [`Columns`] layout and [`Schemata`] once, resolving every operand to fixed
//! slot offsets. Comparing tuples afterwards performs no validation.

use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{Columns, Operand, Order, Ordering, PropertyType, Schemata, Tuple, TypeSystem, Value};
use crate::config::{NullOrdering, QueryConfig};
use crate::types::{Location, Path, QuiverError, Result, Segment};

/// Operand resolved to slot offsets.
#[derive(Clone, Debug, PartialEq)]
enum BoundOperand {
    Property { slot: usize, ty: PropertyType },
    Length(Box<BoundOperand>),
    Depth { slot: usize },
    Path { slot: usize },
    Name { slot: usize },
    LocalName { slot: usize },
    Score { slot: usize },
}

/// Sort key extracted from one tuple.
enum Key<'t> {
    Null,
    Typed(&'t Value, PropertyType),
    Long(i64),
    Double(f64),
    Path(&'t Path),
    Segment(Option<&'t Segment>),
    Text(&'t str),
}

impl BoundOperand {
    fn bind(
        operand: &Operand,
        columns: &Columns,
        schemata: &Schemata,
        types: &dyn TypeSystem,
    ) -> Result<Self> {
        let selector = operand.selector();
        let location_slot = columns.location_index(selector).ok_or_else(|| {
            QuiverError::config(format!(
                "ordering on {operand} references selector '{selector}' not in the result"
            ))
        })?;
        let bound = match operand {
            Operand::PropertyValue { selector, property } => {
                let ty = schemata.lookup(selector, property).map_err(|err| {
                    QuiverError::config(format!("ordering on {operand} cannot be bound: {err}"))
                })?;
                if !types.is_orderable(ty) {
                    return Err(QuiverError::config(format!(
                        "ordering on {operand} uses non-orderable type {ty}"
                    )));
                }
                let slot = columns.property_index(selector, property).ok_or_else(|| {
                    QuiverError::config(format!(
                        "ordering on {operand} requires '{property}' to be projected"
                    ))
                })?;
                BoundOperand::Property { slot, ty }
            }
            Operand::Length(inner) => {
                BoundOperand::Length(Box::new(Self::bind(inner, columns, schemata, types)?))
            }
            Operand::NodeDepth(_) => BoundOperand::Depth {
                slot: location_slot,
            },
            Operand::NodePath(_) => BoundOperand::Path {
                slot: location_slot,
            },
            Operand::NodeName(_) => BoundOperand::Name {
                slot: location_slot,
            },
            Operand::NodeLocalName(_) => BoundOperand::LocalName {
                slot: location_slot,
            },
            Operand::FullTextSearchScore(_) => {
                let slot = columns.score_index(selector).ok_or_else(|| {
                    QuiverError::config(format!(
                        "ordering on {operand} requires full-text search scores"
                    ))
                })?;
                BoundOperand::Score { slot }
            }
        };
        Ok(bound)
    }

    fn key<'t>(&self, tuple: &'t Tuple) -> Key<'t> {
        match self {
            BoundOperand::Property { slot, ty } => match &tuple[*slot] {
                Value::Null => Key::Null,
                value => Key::Typed(value, *ty),
            },
            BoundOperand::Length(inner) => match inner.key(tuple).length() {
                Some(len) => Key::Long(len),
                None => Key::Null,
            },
            BoundOperand::Depth { slot } => location_at(tuple, *slot)
                .map(|loc| Key::Long(loc.depth() as i64))
                .unwrap_or(Key::Null),
            BoundOperand::Path { slot } => location_at(tuple, *slot)
                .map(|loc| Key::Path(&loc.path))
                .unwrap_or(Key::Null),
            BoundOperand::Name { slot } => location_at(tuple, *slot)
                .map(|loc| Key::Segment(loc.name()))
                .unwrap_or(Key::Null),
            BoundOperand::LocalName { slot } => location_at(tuple, *slot)
                .map(|loc| Key::Text(loc.local_name()))
                .unwrap_or(Key::Null),
            BoundOperand::Score { slot } => tuple[*slot]
                .as_f64()
                .map(Key::Double)
                .unwrap_or(Key::Null),
        }
    }
}

fn location_at(tuple: &Tuple, slot: usize) -> Option<&Location> {
    tuple[slot].as_location()
}

impl Key<'_> {
    fn length(&self) -> Option<i64> {
        let len = match self {
            Key::Null => return None,
            Key::Typed(value, _) => return value.length(),
            Key::Long(v) => v.to_string().len(),
            Key::Double(v) => v.to_string().len(),
            Key::Path(path) => path.to_string().chars().count(),
            Key::Segment(segment) => segment.map_or(0, |s| s.to_string().chars().count()),
            Key::Text(text) => text.chars().count(),
        };
        Some(len as i64)
    }

    fn compare(&self, other: &Key<'_>, types: &dyn TypeSystem, nulls: NullOrdering) -> CmpOrdering {
        let null_first = match nulls {
            NullOrdering::First => CmpOrdering::Less,
            NullOrdering::Last => CmpOrdering::Greater,
        };
        match (self, other) {
            (Key::Null, Key::Null) => CmpOrdering::Equal,
            (Key::Null, _) => null_first,
            (_, Key::Null) => null_first.reverse(),
            (Key::Typed(a, ty), Key::Typed(b, _)) => types.compare(*ty, a, b),
            (Key::Long(a), Key::Long(b)) => a.cmp(b),
            (Key::Double(a), Key::Double(b)) => a.total_cmp(b),
            (Key::Path(a), Key::Path(b)) => a.cmp(b),
            (Key::Segment(a), Key::Segment(b)) => a.cmp(b),
            (Key::Text(a), Key::Text(b)) => a.cmp(b),
            // Both keys come from the same bound operand.
            _ => CmpOrdering::Equal,
        }
    }
}

/// Stable multi-key comparator over tuples of one [`Columns`] layout.
#[derive(Clone)]
pub struct TupleSorter {
    keys: Vec<(BoundOperand, Order)>,
    types: Arc<dyn TypeSystem>,
    nulls: NullOrdering,
}

impl TupleSorter {
    /// Validates `orderings` against the layout and schemata.
    ///
    /// Fails with a configuration error when an operand names a selector or
    /// column the layout does not carry, a column the schemata does not
    /// declare, a non-orderable type, or a score on a layout without scores.
    pub fn bind(
        orderings: &[Ordering],
        columns: &Columns,
        schemata: &Schemata,
        types: Arc<dyn TypeSystem>,
        config: &QueryConfig,
    ) -> Result<Self> {
        let keys = orderings
            .iter()
            .map(|ordering| {
                BoundOperand::bind(&ordering.operand, columns, schemata, types.as_ref())
                    .map(|bound| (bound, ordering.order))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(keys = keys.len(), nulls = ?config.nulls, "sort.bind");
        Ok(Self {
            keys,
            types,
            nulls: config.nulls,
        })
    }

    /// Number of bound sort keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Compares two tuples key by key; the first differing key decides.
    pub fn compare(&self, left: &Tuple, right: &Tuple) -> CmpOrdering {
        for (operand, order) in &self.keys {
            let natural = operand
                .key(left)
                .compare(&operand.key(right), self.types.as_ref(), self.nulls);
            if natural != CmpOrdering::Equal {
                return order.apply(natural);
            }
        }
        CmpOrdering::Equal
    }

    /// Sorts `tuples` in place; full ties keep their original relative order.
    pub fn sort(&self, tuples: &mut [Tuple]) {
        trace!(rows = tuples.len(), keys = self.keys.len(), "sort.run");
        tuples.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Debug for TupleSorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TupleSorter")
            .field("keys", &self.keys)
            .field("nulls", &self.nulls)
            .finish_non_exhaustive()
    }
}
