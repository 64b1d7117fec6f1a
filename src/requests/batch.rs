//! Flattening batch combinator.

use std::slice;
use std::sync::Arc;

use tracing::trace;

use super::{GraphRequest, RequestKind};
use crate::types::{QuiverError, Result};

/// A single request or a flat batch of requests.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    /// One unit of work.
    Single(Arc<GraphRequest>),
    /// Two or more units, never nested.
    Batch(RequestBatch),
}

impl Request {
    /// Wraps a request kind in a fresh single request.
    pub fn single(kind: RequestKind) -> Self {
        Request::Single(Arc::new(GraphRequest::new(kind)))
    }

    /// Normalizes zero or more candidate requests into one unit.
    ///
    /// `None` items are dropped and batches are spliced in member by member.
    /// A lone surviving candidate is returned as is, so wrapping one request
    /// never allocates a batch. Fails with `InvalidArgument` when nothing
    /// survives.
    pub fn with<I>(requests: I) -> Result<Request>
    where
        I: IntoIterator,
        I::Item: Into<Option<Request>>,
    {
        let mut candidates: Vec<Request> = requests.into_iter().filter_map(Into::into).collect();
        match candidates.len() {
            0 => Err(QuiverError::invalid("no requests")),
            1 => Ok(candidates.swap_remove(0)),
            n => {
                let mut flat = Vec::with_capacity(n);
                for candidate in candidates {
                    candidate.flatten_into(&mut flat);
                }
                trace!(candidates = n, members = flat.len(), "batch.with");
                Ok(Request::Batch(RequestBatch::from_flat(flat)))
            }
        }
    }

    /// Returns true for the batch variant.
    pub fn is_batch(&self) -> bool {
        matches!(self, Request::Batch(_))
    }

    /// Number of units: 1 for a single request, the member count otherwise.
    pub fn len(&self) -> usize {
        match self {
            Request::Single(_) => 1,
            Request::Batch(batch) => batch.size(),
        }
    }

    /// Always false; a request holds at least one unit.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Units in dispatch order; a single request yields itself.
    pub fn iter(&self) -> slice::Iter<'_, Arc<GraphRequest>> {
        match self {
            Request::Single(request) => slice::from_ref(request).iter(),
            Request::Batch(batch) => batch.iter(),
        }
    }

    /// Returns true when any unit has a recorded failure.
    pub fn has_error(&self) -> bool {
        match self {
            Request::Single(request) => request.has_error(),
            Request::Batch(batch) => batch.has_error(),
        }
    }

    fn flatten_into(self, out: &mut Vec<Arc<GraphRequest>>) {
        match self {
            Request::Single(request) => out.push(request),
            Request::Batch(batch) => out.extend(batch.requests.iter().cloned()),
        }
    }
}

impl From<GraphRequest> for Request {
    fn from(request: GraphRequest) -> Self {
        Request::Single(Arc::new(request))
    }
}

impl From<Arc<GraphRequest>> for Request {
    fn from(request: Arc<GraphRequest>) -> Self {
        Request::Single(request)
    }
}

impl From<RequestBatch> for Request {
    fn from(batch: RequestBatch) -> Self {
        Request::Batch(batch)
    }
}

/// Immutable, flat, order-preserving group of requests.
///
/// Cloning shares the member list. Members are handed out by shared
/// reference; connectors record outcomes on the members themselves.
#[derive(Clone, Debug)]
pub struct RequestBatch {
    requests: Arc<[Arc<GraphRequest>]>,
}

impl RequestBatch {
    fn from_flat(requests: Vec<Arc<GraphRequest>>) -> Self {
        Self {
            requests: requests.into(),
        }
    }

    /// Returns a new batch with this batch's members followed by `requests`.
    ///
    /// The appended candidates are flattened exactly as in [`Request::with`].
    /// When no candidate survives, this batch is returned sharing the same
    /// member list.
    pub fn add<I>(&self, requests: I) -> RequestBatch
    where
        I: IntoIterator,
        I::Item: Into<Option<Request>>,
    {
        let mut appended = Vec::new();
        for candidate in requests.into_iter().filter_map(Into::into) {
            candidate.flatten_into(&mut appended);
        }
        if appended.is_empty() {
            trace!(members = self.size(), "batch.add.unchanged");
            return self.clone();
        }
        let mut flat = Vec::with_capacity(self.size() + appended.len());
        flat.extend(self.requests.iter().cloned());
        flat.append(&mut appended);
        trace!(
            members = flat.len(),
            appended = flat.len() - self.size(),
            "batch.add"
        );
        Self::from_flat(flat)
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.requests.len()
    }

    /// Member at `index` in dispatch order.
    pub fn get(&self, index: usize) -> Option<&Arc<GraphRequest>> {
        self.requests.get(index)
    }

    /// Read-only view of the members.
    pub fn requests(&self) -> &[Arc<GraphRequest>] {
        &self.requests
    }

    /// Members in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, Arc<GraphRequest>> {
        self.requests.iter()
    }

    /// Returns true when any member has a recorded failure.
    pub fn has_error(&self) -> bool {
        self.requests.iter().any(|request| request.has_error())
    }

    /// Returns true when both handles share one member list.
    pub fn ptr_eq(&self, other: &RequestBatch) -> bool {
        Arc::ptr_eq(&self.requests, &other.requests)
    }
}

impl PartialEq for RequestBatch {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size()
            && self
                .requests
                .iter()
                .zip(other.requests.iter())
                .all(|(left, right)| **left == **right)
    }
}

impl<'a> IntoIterator for &'a RequestBatch {
    type Item = &'a Arc<GraphRequest>;
    type IntoIter = slice::Iter<'a, Arc<GraphRequest>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
