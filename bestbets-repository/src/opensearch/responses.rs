//! OpenSearch response parsers.

use chrono::DateTime;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{BulkIndexSummary, BulkItemError, IndexInfo};

/// Classify every item of a bulk response as created, updated, or rejected.
///
/// Each item is keyed by its action (`index`, `create`, ...); an item with an
/// `error` is a rejection regardless of its `result`.
pub fn parse_bulk_response(body: &Value) -> Result<BulkIndexSummary, SearchIndexError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response has no items"))?;

    let mut summary = BulkIndexSummary::default();
    for item in items {
        let Some(outcome) = item.as_object().and_then(|action| action.values().next()) else {
            return Err(SearchIndexError::parse("Bulk response item has no action"));
        };

        let id = outcome
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if let Some(error) = outcome.get("error") {
            summary.errors.push(BulkItemError {
                id,
                error: error.clone(),
            });
            continue;
        }

        match outcome.get("result").and_then(Value::as_str) {
            Some("updated") => summary.updated.push(id),
            Some("created") => summary.created.push(id),
            other => {
                summary.errors.push(BulkItemError {
                    id,
                    error: Value::String(format!("Unexpected bulk result: {:?}", other)),
                });
            }
        }
    }

    Ok(summary)
}

/// Names of the indices an alias currently points at.
///
/// The body is the `GET _alias/{alias}` response, keyed by index name.
pub fn parse_alias_holders(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body
        .as_object()
        .map(|indices| indices.keys().cloned().collect())
        .unwrap_or_default();
    names.sort();
    names
}

/// Build the retention candidates from a `GET {alias}_*` response.
///
/// Creation dates come from `settings.index.creation_date` (epoch millis as a
/// string); aliasing from the per-index `aliases` object.
pub fn parse_index_listing(
    body: &Value,
    alias_name: &str,
) -> Result<Vec<IndexInfo>, SearchIndexError> {
    let Some(indices) = body.as_object() else {
        return Err(SearchIndexError::parse("Index listing is not an object"));
    };

    indices
        .iter()
        .map(|(name, meta)| {
            let millis = meta
                .pointer("/settings/index/creation_date")
                .and_then(|v| match v {
                    Value::String(s) => s.parse::<i64>().ok(),
                    Value::Number(n) => n.as_i64(),
                    _ => None,
                })
                .ok_or_else(|| {
                    SearchIndexError::parse(format!("Index {} has no creation date", name))
                })?;

            let created_at = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
                SearchIndexError::parse(format!("Index {} has an invalid creation date", name))
            })?;

            let aliased = meta
                .get("aliases")
                .and_then(|aliases| aliases.get(alias_name))
                .is_some();

            Ok(IndexInfo {
                name: name.clone(),
                created_at,
                aliased,
            })
        })
        .collect()
}
