//! Result tuple layout.
//!
//! A [`Columns`] descriptor fixes the positional layout every [`Tuple`] of one
//! query execution follows:
//!
//! ```text
//! [ value_0 .. value_{c-1} | location_0 .. location_{s-1} | score_0 .. score_{s-1} ]
//! ```
//!
//! where `c` is the column count and `s` the number of distinct selectors.
//! Values follow column order, locations and scores follow selector order, and
//! `score_i` always belongs to the same selector as `location_i`. The score
//! block is present only when full-text scoring is enabled. Offsets are
//! computed once at construction; tuples are never inspected to rediscover
//! them.

use std::ops::Index;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::{Column, SelectorName, Value};
use crate::types::{Location, QuiverError, Result};

/// Score recorded for a selector whose source did not compute relevance.
pub const NEUTRAL_SCORE: f64 = 1.0;

/// One result row laid out according to a [`Columns`] descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuple {
    slots: Vec<Value>,
}

impl Tuple {
    /// Wraps already laid-out slots.
    pub fn new(slots: Vec<Value>) -> Self {
        Self { slots }
    }

    /// Slot at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index)
    }

    /// All slots in layout order.
    pub fn slots(&self) -> &[Value] {
        &self.slots
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true for a tuple without slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Consumes the tuple, returning its slots.
    pub fn into_slots(self) -> Vec<Value> {
        self.slots
    }
}

impl Index<usize> for Tuple {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.slots[index]
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(slots: Vec<Value>) -> Self {
        Tuple::new(slots)
    }
}

/// Frozen tuple-layout descriptor for one query execution.
#[derive(Clone, Debug)]
pub struct Columns {
    columns: Vec<Column>,
    selectors: Vec<SelectorName>,
    full_text_scores: bool,
    by_alias: FxHashMap<String, usize>,
    by_property: FxHashMap<(SelectorName, String), usize>,
    by_selector: FxHashMap<SelectorName, usize>,
}

impl Columns {
    /// Layout over `columns`, with selectors in first-seen column order.
    pub fn new(columns: Vec<Column>, full_text_scores: bool) -> Result<Self> {
        Self::with_joined(columns, std::iter::empty(), full_text_scores)
    }

    /// Layout over `columns` plus joined selectors that may project nothing.
    ///
    /// Selectors seen in `columns` come first, in first-seen order, followed by
    /// any `joined` selector not already present.
    pub fn with_joined<I>(columns: Vec<Column>, joined: I, full_text_scores: bool) -> Result<Self>
    where
        I: IntoIterator<Item = SelectorName>,
    {
        let mut seen = FxHashSet::default();
        let mut selectors = Vec::new();
        let from_columns = columns.iter().map(|column| column.selector.clone());
        for selector in from_columns.chain(joined) {
            if seen.insert(selector.clone()) {
                selectors.push(selector);
            }
        }
        Self::from_parts(columns, selectors, full_text_scores)
    }

    /// Layout with an explicit selector order.
    ///
    /// `selectors` must list every selector referenced by `columns` exactly
    /// once; it may also list selectors that project no column.
    pub fn with_selectors(
        columns: Vec<Column>,
        selectors: Vec<SelectorName>,
        full_text_scores: bool,
    ) -> Result<Self> {
        let mut listed = FxHashSet::default();
        for selector in &selectors {
            if !listed.insert(selector) {
                return Err(QuiverError::config(format!(
                    "selector '{selector}' is listed more than once"
                )));
            }
        }
        if let Some(column) = columns.iter().find(|c| !listed.contains(&c.selector)) {
            return Err(QuiverError::config(format!(
                "column '{}' references selector '{}' missing from the selector list",
                column.alias, column.selector
            )));
        }
        Self::from_parts(columns, selectors, full_text_scores)
    }

    fn from_parts(
        columns: Vec<Column>,
        selectors: Vec<SelectorName>,
        full_text_scores: bool,
    ) -> Result<Self> {
        if selectors.is_empty() {
            return Err(QuiverError::config(
                "a tuple layout needs at least one selector",
            ));
        }
        if let Some(selector) = selectors.iter().find(|s| s.as_str().is_empty()) {
            return Err(QuiverError::config(format!(
                "selector name cannot be empty (got '{selector}')"
            )));
        }
        let mut by_alias = FxHashMap::default();
        let mut by_property = FxHashMap::default();
        for (idx, column) in columns.iter().enumerate() {
            if column.alias.is_empty() || column.property.is_empty() {
                return Err(QuiverError::config(format!(
                    "column {idx} on selector '{}' needs a property and an alias",
                    column.selector
                )));
            }
            by_alias.entry(column.alias.clone()).or_insert(idx);
            by_property
                .entry((column.selector.clone(), column.property.clone()))
                .or_insert(idx);
        }
        let by_selector = selectors
            .iter()
            .enumerate()
            .map(|(idx, selector)| (selector.clone(), idx))
            .collect();
        let layout = Self {
            columns,
            selectors,
            full_text_scores,
            by_alias,
            by_property,
            by_selector,
        };
        debug!(
            columns = layout.column_count(),
            locations = layout.location_count(),
            tuple_size = layout.tuple_size(),
            scores = full_text_scores,
            "columns.layout"
        );
        Ok(layout)
    }

    /// Layout of the rows produced by joining rows of `self` with rows of
    /// `other`: columns and selectors of `self` first, then those of `other`.
    ///
    /// The selector sets must be disjoint. Scores are kept when either side
    /// has them.
    pub fn join(&self, other: &Columns) -> Result<Columns> {
        if let Some(shared) = other.selectors.iter().find(|s| self.by_selector.contains_key(*s)) {
            return Err(QuiverError::config(format!(
                "selector '{shared}' appears on both sides of a join"
            )));
        }
        let columns = self.columns.iter().chain(&other.columns).cloned().collect();
        let selectors = self.selectors.iter().chain(&other.selectors).cloned().collect();
        Self::from_parts(
            columns,
            selectors,
            self.full_text_scores || other.full_text_scores,
        )
    }

    /// Number of projected values.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of location slots, one per distinct selector.
    pub fn location_count(&self) -> usize {
        self.selectors.len()
    }

    /// Returns true when tuples carry a score block.
    pub fn has_full_text_search_scores(&self) -> bool {
        self.full_text_scores
    }

    /// Total slots per tuple.
    pub fn tuple_size(&self) -> usize {
        let scores = if self.full_text_scores {
            self.location_count()
        } else {
            0
        };
        self.column_count() + self.location_count() + scores
    }

    /// Distinct selectors in layout order.
    pub fn selector_names(&self) -> &[SelectorName] {
        &self.selectors
    }

    /// Projected columns in layout order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column aliases in layout order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|column| column.alias.as_str())
    }

    /// Slot of the first column exposed as `alias`.
    pub fn column_index(&self, alias: &str) -> Option<usize> {
        self.by_alias.get(alias).copied()
    }

    /// Slot of the first column projecting `property` from `selector`.
    pub fn property_index(&self, selector: &SelectorName, property: &str) -> Option<usize> {
        self.by_property
            .get(&(selector.clone(), property.to_owned()))
            .copied()
    }

    /// Position of `selector` within the selector order.
    pub fn selector_index(&self, selector: &SelectorName) -> Option<usize> {
        self.by_selector.get(selector).copied()
    }

    /// Slot holding `selector`'s location.
    pub fn location_index(&self, selector: &SelectorName) -> Option<usize> {
        self.selector_index(selector)
            .map(|idx| self.column_count() + idx)
    }

    /// Slot holding `selector`'s score; `None` without scoring.
    pub fn score_index(&self, selector: &SelectorName) -> Option<usize> {
        if !self.full_text_scores {
            return None;
        }
        self.selector_index(selector)
            .map(|idx| self.column_count() + self.location_count() + idx)
    }

    /// Lays out one tuple from its three blocks.
    ///
    /// Block lengths are the producer's responsibility and only checked in
    /// debug builds. Scores are dropped when the layout has no score block.
    pub fn tuple(&self, values: Vec<Value>, locations: Vec<Location>, scores: Vec<f64>) -> Tuple {
        debug_assert_eq!(values.len(), self.column_count());
        debug_assert_eq!(locations.len(), self.location_count());
        let mut slots = Vec::with_capacity(self.tuple_size());
        slots.extend(values);
        slots.extend(locations.into_iter().map(Value::Location));
        if self.full_text_scores {
            debug_assert_eq!(scores.len(), self.location_count());
            slots.extend(scores.into_iter().map(Value::Double));
        }
        Tuple::new(slots)
    }

    /// Lays out the tuple produced by joining `left` (laid out by `left_cols`)
    /// with `right` (laid out by `right_cols`); `self` must be
    /// `left_cols.join(right_cols)`.
    ///
    /// A side without scores contributes [`NEUTRAL_SCORE`] per selector.
    pub fn join_tuples(
        &self,
        left_cols: &Columns,
        left: &Tuple,
        right_cols: &Columns,
        right: &Tuple,
    ) -> Tuple {
        let mut slots = Vec::with_capacity(self.tuple_size());
        slots.extend_from_slice(left_cols.values(left));
        slots.extend_from_slice(right_cols.values(right));
        slots.extend_from_slice(left_cols.locations(left));
        slots.extend_from_slice(right_cols.locations(right));
        if self.full_text_scores {
            for (cols, tuple) in [(left_cols, left), (right_cols, right)] {
                match cols.scores(tuple) {
                    Some(scores) => slots.extend_from_slice(scores),
                    None => slots.extend(
                        std::iter::repeat(Value::Double(NEUTRAL_SCORE)).take(cols.location_count()),
                    ),
                }
            }
        }
        Tuple::new(slots)
    }

    /// Projected-value block of `tuple`.
    pub fn values<'t>(&self, tuple: &'t Tuple) -> &'t [Value] {
        &tuple.slots()[..self.column_count()]
    }

    /// Location block of `tuple`.
    pub fn locations<'t>(&self, tuple: &'t Tuple) -> &'t [Value] {
        let start = self.column_count();
        &tuple.slots()[start..start + self.location_count()]
    }

    /// Score block of `tuple`; `None` without scoring.
    pub fn scores<'t>(&self, tuple: &'t Tuple) -> Option<&'t [Value]> {
        if !self.full_text_scores {
            return None;
        }
        let start = self.column_count() + self.location_count();
        Some(&tuple.slots()[start..start + self.location_count()])
    }

    /// Value of the column exposed as `alias`.
    pub fn value<'t>(&self, tuple: &'t Tuple, alias: &str) -> Option<&'t Value> {
        self.column_index(alias).and_then(|idx| tuple.get(idx))
    }

    /// Location of `selector`'s node.
    pub fn location<'t>(&self, tuple: &'t Tuple, selector: &SelectorName) -> Option<&'t Location> {
        self.location_index(selector)
            .and_then(|idx| tuple.get(idx))
            .and_then(Value::as_location)
    }

    /// Relevance score of `selector`'s node.
    pub fn score(&self, tuple: &Tuple, selector: &SelectorName) -> Option<f64> {
        self.score_index(selector)
            .and_then(|idx| tuple.get(idx))
            .and_then(Value::as_f64)
    }
}

impl PartialEq for Columns {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.selectors == other.selectors
            && self.full_text_scores == other.full_text_scores
    }
}

impl Eq for Columns {}
