//! Index manager trait definition.
//!
//! This module defines the abstract interface for index management operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{BulkDocument, BulkIndexSummary, IndexResult};

/// Abstracts the underlying search engine's index management (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into loaders to enable dependency injection and
/// easy testing with mock implementations. Each call is expected to be reliable
/// on its own; ordering and validation around the calls belong to the caller.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait IndexManager: Send + Sync {
    /// Create a new physical index named after the alias plus a timestamp.
    ///
    /// # Arguments
    ///
    /// * `alias_name` - The alias the index will eventually be published under
    /// * `mappings` - The index mappings blob (`{"mappings": {...}}`)
    /// * `settings` - The index settings blob (`{"settings": {...}}`)
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The name of the created index
    /// * `Err(SearchIndexError)` - If the index could not be created
    async fn create_timestamped_index(
        &self,
        alias_name: &str,
        mappings: &Value,
        settings: &Value,
    ) -> Result<String, SearchIndexError>;

    /// Index a single document, replacing any document with the same ID.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexResult)` - The engine's outcome for the write
    /// * `Err(SearchIndexError)` - If the write fails
    async fn index_document(
        &self,
        index_name: &str,
        id: &str,
        document: &Value,
    ) -> Result<IndexResult, SearchIndexError>;

    /// Index multiple documents in one bulk request.
    ///
    /// Rejections of individual documents are reported in the summary rather than
    /// as an error. An empty slice returns an empty summary.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkIndexSummary)` - Per-document outcome (created, updated, errors)
    /// * `Err(SearchIndexError)` - If the bulk request fails entirely
    async fn index_document_bulk(
        &self,
        index_name: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkIndexSummary, SearchIndexError>;

    /// Merge the index down for read performance once loading is finished.
    async fn optimize_index(&self, index_name: &str) -> Result<(), SearchIndexError>;

    /// Point the alias at exactly one index.
    ///
    /// Every index currently holding the alias is detached and `index_name`
    /// attached in a single atomic request.
    async fn set_alias_to_single_index(
        &self,
        alias_name: &str,
        index_name: &str,
    ) -> Result<(), SearchIndexError>;

    /// Delete stale indices created for the alias.
    ///
    /// Indices older than `days_to_keep` days are deleted, except that the newest
    /// `min_indexes_to_keep` always survive and an index the alias points at is
    /// never deleted.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Names of the deleted indices
    /// * `Err(SearchIndexError)` - If listing or deleting fails
    async fn cleanup_old_indices(
        &self,
        alias_name: &str,
        days_to_keep: u32,
        min_indexes_to_keep: u32,
    ) -> Result<Vec<String>, SearchIndexError>;

    /// Delete an index. A missing index is not an error.
    async fn delete_index(&self, index_name: &str) -> Result<(), SearchIndexError>;
}
