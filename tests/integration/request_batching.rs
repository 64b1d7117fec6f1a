use std::sync::Arc;

use quiver::requests::{GraphRequest, Request, RequestBatch, RequestKind, RequestProcessor};
use quiver::types::{Location, Name};
use quiver::{QuiverError, RequestError, Result};

fn loc(path: &str) -> Location {
    Location::parse(path).expect("valid path")
}

fn requests() -> Vec<Request> {
    vec![
        Request::single(RequestKind::ReadProperty {
            on: loc("/a"),
            property: Name::new("property"),
        }),
        Request::single(RequestKind::ReadProperty {
            on: loc("/b"),
            property: Name::new("property"),
        }),
        Request::single(RequestKind::ReadAllChildren { of: loc("/") }),
    ]
}

fn unwrap_batch(request: Request) -> RequestBatch {
    match request {
        Request::Batch(batch) => batch,
        Request::Single(_) => panic!("expected a batch"),
    }
}

fn members(request: &Request) -> Vec<Arc<GraphRequest>> {
    request.iter().cloned().collect()
}

/// Connector that refuses writes and knows only a fixed set of nodes.
struct ReadOnlyConnector {
    known: Vec<Location>,
}

impl RequestProcessor for ReadOnlyConnector {
    fn process_request(&self, request: &GraphRequest) -> std::result::Result<(), RequestError> {
        let kind = request.kind();
        if !kind.is_read_only() {
            return Err(RequestError::Unsupported(kind.name().into()));
        }
        if !self.known.contains(kind.target()) {
            return Err(RequestError::NodeNotFound(kind.target().to_string()));
        }
        Ok(())
    }
}

#[test]
fn singleton_keeps_identity() -> Result<()> {
    let original = requests().remove(0);
    let result = Request::with([original.clone()])?;
    match (&original, &result) {
        (Request::Single(a), Request::Single(b)) => assert!(Arc::ptr_eq(a, b)),
        _ => panic!("expected single requests"),
    }
    Ok(())
}

#[test]
fn batch_preserves_order_and_members() -> Result<()> {
    let input = requests();
    let batch = Request::with(input.clone())?;
    assert!(batch.is_batch());
    assert_eq!(batch.len(), input.len());
    for (member, expected) in batch.iter().zip(input.iter().flat_map(members)) {
        assert!(Arc::ptr_eq(member, &expected));
    }
    assert!(!batch.has_error());
    Ok(())
}

#[test]
fn flattening_is_idempotent() -> Result<()> {
    let flat = Request::with(requests())?;
    let rewrapped = Request::with([flat.clone()])?;
    assert_eq!(rewrapped, flat);
    let [a, b, c]: [Request; 3] = requests().try_into().expect("three requests");
    let nested = Request::with([Request::with([a.clone(), b.clone()])?, c.clone()])?;
    assert_eq!(nested, Request::with([a, b, c])?);
    Ok(())
}

#[test]
fn empty_inputs_are_rejected() {
    for result in [
        Request::with(Vec::<Request>::new()),
        Request::with([None::<Request>]),
        Request::with(vec![None::<Request>; 3]),
    ] {
        assert!(matches!(result, Err(QuiverError::InvalidArgument(_))));
    }
}

#[test]
fn add_builds_new_batch_and_leaves_original() -> Result<()> {
    let [a, b, c]: [Request; 3] = requests().try_into().expect("three requests");
    let original = unwrap_batch(Request::with([a.clone(), b.clone()])?);
    let extended = original.add([c.clone()]);
    assert!(!extended.ptr_eq(&original));
    assert_eq!(original.size(), 2);
    assert_eq!(Request::from(extended), Request::with([a.clone(), b.clone(), c])?);
    assert_eq!(Request::from(original.clone()), Request::with([a, b])?);
    assert!(original.add(Vec::<Request>::new()).ptr_eq(&original));
    Ok(())
}

#[test]
fn add_flattens_appended_batches() -> Result<()> {
    let [a, b, c]: [Request; 3] = requests().try_into().expect("three requests");
    let original = unwrap_batch(Request::with([a.clone(), b.clone()])?);
    let doubled = original.add([Some(Request::from(original.clone())), None, Some(c.clone())]);
    assert_eq!(doubled.size(), 5);
    assert_eq!(
        Request::from(doubled),
        Request::with([a.clone(), b.clone(), a, b, c])?
    );
    Ok(())
}

#[test]
fn partial_failure_is_visible_per_member() -> Result<()> {
    let batch = Request::with([
        Request::single(RequestKind::ReadNode { at: loc("/known") }),
        Request::single(RequestKind::DeleteBranch { at: loc("/known") }),
        Request::single(RequestKind::ReadNode { at: loc("/unknown") }),
        Request::single(RequestKind::ReadAllProperties { on: loc("/known") }),
    ])?;
    let connector = ReadOnlyConnector {
        known: vec![loc("/known")],
    };
    let summary = connector.process(&batch);
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.failed, 2);
    assert!(batch.has_error());

    let errors: Vec<Option<&'static str>> = batch
        .iter()
        .map(|member| member.error().map(|err| err.code()))
        .collect();
    assert_eq!(
        errors,
        vec![None, Some("Unsupported"), Some("NodeNotFound"), None]
    );
    assert!(batch.iter().filter(|m| !m.has_error()).all(|m| m.is_completed()));
    Ok(())
}
