//! Search index error types.
//!
//! This module defines the error types that can occur during index management operations.

use thiserror::Error;

/// Errors that can occur during index management operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to create an index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to index a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// The bulk request itself failed.
    #[error("Bulk operation error: {0}")]
    BulkOperationError(String),

    /// Failed to read or update an alias.
    #[error("Alias error: {0}")]
    AliasError(String),

    /// Failed to force-merge an index.
    #[error("Optimize error: {0}")]
    OptimizeError(String),

    /// Failed to list or prune old indices.
    #[error("Cleanup error: {0}")]
    CleanupError(String),

    /// Failed to delete an index.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a bulk operation error.
    pub fn bulk_operation(msg: impl Into<String>) -> Self {
        Self::BulkOperationError(msg.into())
    }

    /// Create an alias error.
    pub fn alias(msg: impl Into<String>) -> Self {
        Self::AliasError(msg.into())
    }

    /// Create an optimize error.
    pub fn optimize(msg: impl Into<String>) -> Self {
        Self::OptimizeError(msg.into())
    }

    /// Create a cleanup error.
    pub fn cleanup(msg: impl Into<String>) -> Self {
        Self::CleanupError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}
