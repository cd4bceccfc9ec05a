//! OpenSearch implementation of the index manager.
//!
//! This module provides a concrete implementation of `IndexManager`
//! using OpenSearch as the backend.

mod client;
mod requests;
mod responses;

pub use client::OpenSearchIndexManager;
pub use requests::{index_pattern, timestamped_index_name};
