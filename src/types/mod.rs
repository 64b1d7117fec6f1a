#![forbid(unsafe_code)]

//! Shared identifiers, errors, and node-identity values.

use std::fmt;

use serde::{Deserialize, Serialize};

mod error;
mod path;

pub use error::{QuiverError, RequestError, Result};
pub use path::{Location, Name, Path, Segment};

/// Stable identifier assigned to a node by its connector.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        NodeId(value)
    }
}

impl From<NodeId> for u64 {
    fn from(value: NodeId) -> Self {
        value.0
    }
}
