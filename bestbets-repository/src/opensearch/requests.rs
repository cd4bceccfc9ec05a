//! OpenSearch request builders.
//!
//! This module provides functions to build the request bodies the index
//! manager sends: index creation, bulk writes, and alias swaps.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::types::BulkDocument;

/// Timestamp format appended to the alias name for new indices.
const INDEX_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build the name of a new physical index for an alias.
///
/// Uses format: `{alias}_{YYYYMMDD_HHMMSS}` so names sort by creation time.
pub fn timestamped_index_name(alias_name: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}", alias_name, now.format(INDEX_TIMESTAMP_FORMAT))
}

/// Pattern matching every physical index created for an alias.
pub fn index_pattern(alias_name: &str) -> String {
    format!("{}_*", alias_name)
}

/// Build the index creation body from the mappings and settings blobs.
///
/// The top-level keys of both blobs are merged, so `{"mappings": ...}` and
/// `{"settings": ...}` become one body. Keys in `settings` win on conflict.
pub fn build_create_index_body(mappings: &Value, settings: &Value) -> Value {
    let mut body = Map::new();
    for blob in [mappings, settings] {
        if let Some(object) = blob.as_object() {
            for (key, value) in object {
                body.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(body)
}

/// Build the newline-delimited bulk body: one action line followed by one source line per document.
pub fn build_bulk_body(index_name: &str, documents: &[BulkDocument]) -> Vec<Value> {
    let mut body = Vec::with_capacity(documents.len() * 2);
    for doc in documents {
        body.push(json!({"index": {"_index": index_name, "_id": doc.id}}));
        body.push(doc.body.clone());
    }
    body
}

/// Build the `_aliases` actions that detach `current` and attach `index_name`.
///
/// All actions go in one request so the engine applies them atomically.
pub fn build_alias_actions(alias_name: &str, current: &[String], index_name: &str) -> Value {
    let mut actions: Vec<Value> = current
        .iter()
        .filter(|name| name.as_str() != index_name)
        .map(|name| json!({"remove": {"index": name, "alias": alias_name}}))
        .collect();
    actions.push(json!({"add": {"index": index_name, "alias": alias_name}}));

    json!({ "actions": actions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamped_index_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();

        let name = timestamped_index_name("bestbets_v1", now);

        assert_eq!(name, "bestbets_v1_20240307_140509");
        assert_ne!(name, "bestbets_v1");
        assert!(name.starts_with("bestbets_v1"));
    }

    #[test]
    fn test_index_pattern() {
        assert_eq!(index_pattern("bestbets_v1"), "bestbets_v1_*");
    }

    #[test]
    fn test_create_index_body_merges_blobs() {
        let mappings = json!({"mappings": {"properties": {"synonym": {"type": "text"}}}});
        let settings = json!({"settings": {"index": {"number_of_shards": 1}}});

        let body = build_create_index_body(&mappings, &settings);

        assert_eq!(body["mappings"]["properties"]["synonym"]["type"], "text");
        assert_eq!(body["settings"]["index"]["number_of_shards"], 1);
    }

    #[test]
    fn test_bulk_body_layout() {
        let documents = vec![
            BulkDocument::new("1045389_1", json!({"synonym": "a"})),
            BulkDocument::new("1045389_2", json!({"synonym": "b"})),
        ];

        let body = build_bulk_body("bestbets_v1_20240307_140509", &documents);

        assert_eq!(body.len(), 4);
        assert_eq!(body[0]["index"]["_id"], "1045389_1");
        assert_eq!(body[0]["index"]["_index"], "bestbets_v1_20240307_140509");
        assert_eq!(body[1]["synonym"], "a");
        assert_eq!(body[2]["index"]["_id"], "1045389_2");
    }

    #[test]
    fn test_alias_actions_swap_in_one_request() {
        let current = vec!["bestbets_v1_old".to_string()];

        let body = build_alias_actions("bestbets_v1", &current, "bestbets_v1_new");
        let actions = body["actions"].as_array().unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0]["remove"]["index"], "bestbets_v1_old");
        assert_eq!(actions[1]["add"]["index"], "bestbets_v1_new");
        assert_eq!(actions[1]["add"]["alias"], "bestbets_v1");
    }

    #[test]
    fn test_alias_actions_without_current_holder() {
        let body = build_alias_actions("bestbets_v1", &[], "bestbets_v1_new");

        assert_eq!(body["actions"].as_array().unwrap().len(), 1);
    }
}
