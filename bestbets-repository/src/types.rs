//! Request and response types for index management operations.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Result of writing a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResult {
    /// The engine's outcome for the write, e.g. `created` or `updated`.
    pub result: String,
}

impl IndexResult {
    /// Whether the write created a new document.
    pub fn is_created(&self) -> bool {
        self.result == "created"
    }
}

/// A document to write as part of a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocument {
    /// The document identifier.
    pub id: String,
    /// The document body.
    pub body: Value,
}

impl BulkDocument {
    /// Create a bulk document.
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// A document the engine rejected within a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemError {
    /// Identifier of the rejected document.
    pub id: String,
    /// The engine's error payload.
    pub error: Value,
}

/// Per-document outcome of a bulk request.
///
/// Every document of the request lands in exactly one of the three lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkIndexSummary {
    /// Identifiers of documents that did not exist before the write.
    pub created: Vec<String>,
    /// Identifiers of documents that replaced an existing document.
    pub updated: Vec<String>,
    /// Documents the engine rejected.
    pub errors: Vec<BulkItemError>,
}

impl BulkIndexSummary {
    /// Whether any document was rejected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether any document overwrote an existing one.
    pub fn has_updates(&self) -> bool {
        !self.updated.is_empty()
    }

    /// Number of documents the summary accounts for.
    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len() + self.errors.len()
    }
}

/// A physical index considered for retention cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    /// The physical index name.
    pub name: String,
    /// When the index was created.
    pub created_at: DateTime<Utc>,
    /// Whether the alias currently points at this index.
    pub aliased: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bulk_summary_flags() {
        let mut summary = BulkIndexSummary::default();
        assert!(!summary.has_errors());
        assert!(!summary.has_updates());

        summary.created.push("1045389_1".to_string());
        summary.updated.push("1045389_2".to_string());
        summary.errors.push(BulkItemError {
            id: "1045389_3".to_string(),
            error: json!({"type": "mapper_parsing_exception"}),
        });

        assert!(summary.has_errors());
        assert!(summary.has_updates());
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_index_result_created() {
        let created = IndexResult {
            result: "created".to_string(),
        };
        let updated = IndexResult {
            result: "updated".to_string(),
        };

        assert!(created.is_created());
        assert!(!updated.is_created());
    }
}
