//! # Best Bets Repository
//!
//! This crate provides the index management capability the best bets loader
//! depends on: creating timestamped indices, writing documents, swapping the
//! published alias, and pruning stale indices. It includes definitions for
//! errors, the `IndexManager` interface, and a concrete implementation for
//! OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod retention;
pub mod types;

pub use config::IndexManagerConfig;
pub use errors::SearchIndexError;
pub use interfaces::IndexManager;
pub use opensearch::OpenSearchIndexManager;
pub use types::{BulkDocument, BulkIndexSummary, BulkItemError, IndexInfo, IndexResult};
