//! Request batching and query result shaping for a federated graph repository.
//!
//! Graph operations are described as [`requests::GraphRequest`]s and grouped
//! into flat, immutable [`requests::RequestBatch`]es before dispatch. Query
//! execution produces [`query::Tuple`]s laid out by a [`query::Columns`]
//! descriptor and ordered by a [`query::TupleSorter`].

#![warn(missing_docs)]

pub mod config;
pub mod query;
pub mod requests;
pub mod types;

pub use config::{NullOrdering, QueryConfig};
pub use types::{QuiverError, RequestError, Result};
