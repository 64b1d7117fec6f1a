//! Query model values handed over by the planner: selectors, projected
//! columns, and orderings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a source node-set participating in a query, like a table alias.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SelectorName(pub String);

impl SelectorName {
    /// Creates a selector name.
    pub fn new(name: impl Into<String>) -> Self {
        SelectorName(name.into())
    }

    /// Borrows the selector name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SelectorName {
    fn from(value: &str) -> Self {
        SelectorName(value.to_owned())
    }
}

impl From<String> for SelectorName {
    fn from(value: String) -> Self {
        SelectorName(value)
    }
}

/// One projected value: a property of a selector, exposed under an alias.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Selector the property is read from.
    pub selector: SelectorName,
    /// Property name on the selector's nodes.
    pub property: String,
    /// Name the column is exposed under in results.
    pub alias: String,
}

impl Column {
    /// Creates a column with an explicit alias.
    pub fn new(
        selector: impl Into<SelectorName>,
        property: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into(),
            property: property.into(),
            alias: alias.into(),
        }
    }

    /// Creates a column aliased by its property name.
    pub fn named(selector: impl Into<SelectorName>, property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            selector: selector.into(),
            alias: property.clone(),
            property,
        }
    }
}

/// Sort direction of an [`Ordering`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl Order {
    /// Applies the direction to a natural-order comparison.
    pub fn apply(self, natural: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Order::Ascending => natural,
            Order::Descending => natural.reverse(),
        }
    }
}

/// Key-extraction strategy that reads a comparable value out of a tuple.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Operand {
    /// A projected property value.
    PropertyValue {
        /// Selector owning the property.
        selector: SelectorName,
        /// Property name.
        property: String,
    },
    /// Length of whatever the inner operand resolves to.
    Length(Box<Operand>),
    /// Number of path segments of the selector's node.
    NodeDepth(SelectorName),
    /// Full path of the selector's node.
    NodePath(SelectorName),
    /// Last path segment of the selector's node, same-name-sibling index included.
    NodeName(SelectorName),
    /// Local part of the last path segment, without namespace or index.
    NodeLocalName(SelectorName),
    /// Full-text relevance score of the selector's node.
    FullTextSearchScore(SelectorName),
}

impl Operand {
    /// Shorthand for [`Operand::PropertyValue`].
    pub fn property_value(selector: impl Into<SelectorName>, property: impl Into<String>) -> Self {
        Operand::PropertyValue {
            selector: selector.into(),
            property: property.into(),
        }
    }

    /// Shorthand for [`Operand::Length`].
    pub fn length(inner: Operand) -> Self {
        Operand::Length(Box::new(inner))
    }

    /// Selector the operand reads from.
    pub fn selector(&self) -> &SelectorName {
        match self {
            Operand::PropertyValue { selector, .. } => selector,
            Operand::Length(inner) => inner.selector(),
            Operand::NodeDepth(selector)
            | Operand::NodePath(selector)
            | Operand::NodeName(selector)
            | Operand::NodeLocalName(selector)
            | Operand::FullTextSearchScore(selector) => selector,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::PropertyValue { selector, property } => write!(f, "{selector}.{property}"),
            Operand::Length(inner) => write!(f, "LENGTH({inner})"),
            Operand::NodeDepth(selector) => write!(f, "DEPTH({selector})"),
            Operand::NodePath(selector) => write!(f, "PATH({selector})"),
            Operand::NodeName(selector) => write!(f, "NAME({selector})"),
            Operand::NodeLocalName(selector) => write!(f, "LOCALNAME({selector})"),
            Operand::FullTextSearchScore(selector) => write!(f, "SCORE({selector})"),
        }
    }
}

/// One sort key: an operand and its direction.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Ordering {
    /// Key extractor.
    pub operand: Operand,
    /// Sort direction.
    pub order: Order,
}

impl Ordering {
    /// Creates an ordering.
    pub fn new(operand: Operand, order: Order) -> Self {
        Self { operand, order }
    }

    /// Ascending ordering on `operand`.
    pub fn ascending(operand: Operand) -> Self {
        Self::new(operand, Order::Ascending)
    }

    /// Descending ordering on `operand`.
    pub fn descending(operand: Operand) -> Self {
        Self::new(operand, Order::Descending)
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.order {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        };
        write!(f, "{} {dir}", self.operand)
    }
}
