//! Dispatch contract between batches and connectors.

use tracing::{debug, trace};

use super::{GraphRequest, Request};
use crate::types::RequestError;

/// Counts gathered while dispatching one request or batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Members handed to the connector.
    pub processed: usize,
    /// Members whose processing recorded an error.
    pub failed: usize,
    /// Members skipped because they were already cancelled.
    pub skipped: usize,
}

impl ProcessSummary {
    /// Returns true when every processed member succeeded and none were skipped.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// Connector-side processing of graph requests.
///
/// Implementors handle one unit at a time. [`RequestProcessor::process`] walks a
/// request or batch in iteration order and records each outcome on its
/// member; one failing member never stops the walk and never becomes an error
/// of the batch as a whole.
pub trait RequestProcessor {
    /// Executes a single unit against the backing store.
    fn process_request(&self, request: &GraphRequest) -> Result<(), RequestError>;

    /// Dispatches every unit of `request` sequentially, recording outcomes.
    fn process(&self, request: &Request) -> ProcessSummary {
        let mut summary = ProcessSummary::default();
        for member in request.iter() {
            if member.is_cancelled() {
                if !member.has_error() {
                    member.set_error(RequestError::Cancelled);
                }
                summary.skipped += 1;
                trace!(op = member.kind().name(), "request.skip.cancelled");
                continue;
            }
            summary.processed += 1;
            match self.process_request(member) {
                Ok(()) => {
                    member.clear_error();
                    member.mark_completed();
                }
                Err(err) => {
                    debug!(
                        op = member.kind().name(),
                        target = %member.kind().target(),
                        code = err.code(),
                        "request.failed"
                    );
                    member.set_error(err);
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}
