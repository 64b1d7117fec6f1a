#![forbid(unsafe_code)]

//! Graph operation requests and the batching combinator over them.
//!
//! A [`GraphRequest`] describes one operation against the graph and owns the
//! outcome slot a connector writes after processing it. [`Request`] is either a
//! single unit or a flat [`RequestBatch`] of units; batches are built only
//! through [`Request::with`] and [`RequestBatch::add`], which flatten nested
//! batches so no batch ever contains another.

use std::fmt;

use parking_lot::Mutex;

use crate::query::Value;
use crate::types::{Location, Name, RequestError};

mod batch;
mod processor;

pub use batch::{Request, RequestBatch};
pub use processor::{ProcessSummary, RequestProcessor};

/// The graph operation a request describes.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestKind {
    /// Read a node's properties and children.
    ReadNode {
        /// Node to read.
        at: Location,
    },
    /// Read the locations of every child of a node.
    ReadAllChildren {
        /// Parent node.
        of: Location,
    },
    /// Read one property of a node.
    ReadProperty {
        /// Node owning the property.
        on: Location,
        /// Property to read.
        property: Name,
    },
    /// Read every property of a node.
    ReadAllProperties {
        /// Node owning the properties.
        on: Location,
    },
    /// Create a child node with initial properties.
    CreateNode {
        /// Parent of the new node.
        under: Location,
        /// Name of the new child.
        child: Name,
        /// Initial property values.
        properties: Vec<(Name, Value)>,
    },
    /// Set property values on an existing node.
    UpdateProperties {
        /// Node to update.
        on: Location,
        /// New property values.
        properties: Vec<(Name, Value)>,
    },
    /// Remove properties from an existing node.
    RemoveProperties {
        /// Node to update.
        on: Location,
        /// Properties to remove.
        properties: Vec<Name>,
    },
    /// Delete a node and its whole subtree.
    DeleteBranch {
        /// Root of the subtree.
        at: Location,
    },
    /// Copy a subtree under a new parent.
    CopyBranch {
        /// Root of the subtree to copy.
        from: Location,
        /// New parent.
        into: Location,
    },
    /// Move a subtree under a new parent.
    MoveBranch {
        /// Root of the subtree to move.
        from: Location,
        /// New parent.
        into: Location,
    },
}

impl RequestKind {
    /// Returns true when the operation never changes the graph.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            RequestKind::ReadNode { .. }
                | RequestKind::ReadAllChildren { .. }
                | RequestKind::ReadProperty { .. }
                | RequestKind::ReadAllProperties { .. }
        )
    }

    /// Primary location the operation acts on.
    pub fn target(&self) -> &Location {
        match self {
            RequestKind::ReadNode { at } | RequestKind::DeleteBranch { at } => at,
            RequestKind::ReadAllChildren { of } => of,
            RequestKind::ReadProperty { on, .. }
            | RequestKind::ReadAllProperties { on }
            | RequestKind::UpdateProperties { on, .. }
            | RequestKind::RemoveProperties { on, .. } => on,
            RequestKind::CreateNode { under, .. } => under,
            RequestKind::CopyBranch { from, .. } | RequestKind::MoveBranch { from, .. } => from,
        }
    }

    /// Short operation name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::ReadNode { .. } => "read_node",
            RequestKind::ReadAllChildren { .. } => "read_all_children",
            RequestKind::ReadProperty { .. } => "read_property",
            RequestKind::ReadAllProperties { .. } => "read_all_properties",
            RequestKind::CreateNode { .. } => "create_node",
            RequestKind::UpdateProperties { .. } => "update_properties",
            RequestKind::RemoveProperties { .. } => "remove_properties",
            RequestKind::DeleteBranch { .. } => "delete_branch",
            RequestKind::CopyBranch { .. } => "copy_branch",
            RequestKind::MoveBranch { .. } => "move_branch",
        }
    }
}

#[derive(Debug, Default)]
struct Outcome {
    error: Option<RequestError>,
    cancelled: bool,
    completed: bool,
}

/// One unit of graph work plus the outcome slot its connector fills in.
///
/// The outcome is written through a shared reference so that a batch can hand
/// out its members without ever being mutated itself.
#[derive(Debug)]
pub struct GraphRequest {
    kind: RequestKind,
    outcome: Mutex<Outcome>,
}

impl GraphRequest {
    /// Creates a request with an empty outcome.
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            outcome: Mutex::new(Outcome::default()),
        }
    }

    /// Operation this request describes.
    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    /// Records a failure, replacing any earlier one.
    pub fn set_error(&self, error: RequestError) {
        self.outcome.lock().error = Some(error);
    }

    /// Clears a recorded failure.
    pub fn clear_error(&self) {
        self.outcome.lock().error = None;
    }

    /// Recorded failure, if any.
    pub fn error(&self) -> Option<RequestError> {
        self.outcome.lock().error.clone()
    }

    /// Returns true when a failure has been recorded.
    pub fn has_error(&self) -> bool {
        self.outcome.lock().error.is_some()
    }

    /// Marks the request cancelled; dispatchers skip cancelled requests.
    pub fn cancel(&self) {
        self.outcome.lock().cancelled = true;
    }

    /// Returns true once [`GraphRequest::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.outcome.lock().cancelled
    }

    /// Marks the request as successfully processed.
    pub fn mark_completed(&self) {
        self.outcome.lock().completed = true;
    }

    /// Returns true once a connector processed the request without error.
    pub fn is_completed(&self) -> bool {
        self.outcome.lock().completed
    }
}

impl PartialEq for GraphRequest {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<RequestKind> for GraphRequest {
    fn from(kind: RequestKind) -> Self {
        GraphRequest::new(kind)
    }
}

impl fmt::Display for GraphRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.name(), self.kind.target())
    }
}
