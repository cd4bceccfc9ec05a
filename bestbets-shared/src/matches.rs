//! Match entries: a category flattened into the rows a loader indexes.

use serde::{Deserialize, Serialize};

/// Tags a match entry as the category's display entry or a synonym entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// The single entry that carries the category's display payload.
    #[serde(rename = "categoryDisplay")]
    CategoryDisplay,
    /// A synonym entry.
    #[serde(rename = "synonym")]
    Synonym,
}

/// One match entry of a category.
///
/// All entries of one category share the same `content_id`. Exactly one of them
/// has `is_category` set; that entry's `synonym` is the category name and it is
/// the only one carrying `category_display`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestBetMatch {
    /// Identifier of the category this entry belongs to.
    #[serde(rename = "contentID")]
    pub content_id: String,
    /// Display name of the category.
    pub category: String,
    /// Numeric boost of the category.
    pub weight: i64,
    /// Marks the entry carrying the category's display payload.
    pub is_category: bool,
    /// The text that triggers (or suppresses) the category.
    pub synonym: String,
    /// ISO 639-1 language code.
    pub language: String,
    /// Whether the entry suppresses the category instead of triggering it.
    pub is_negated: bool,
    /// Whether the entry only matches the exact query text.
    pub is_exact: bool,
    /// Number of tokens in `synonym`.
    pub token_count: u32,
    /// HTML fragment, only present on the category entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_display: Option<String>,
    /// Entry tag.
    #[serde(rename = "record_type")]
    pub record_type: RecordType,
}

impl BestBetMatch {
    /// Whether this entry is the category's display entry.
    pub fn is_display(&self) -> bool {
        self.is_category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_category_entry() {
        let value = json!({
            "isCategory": true,
            "category": "Cancer Research Ideas",
            "weight": 100,
            "contentID": "1045389",
            "synonym": "Cancer Research Ideas",
            "language": "en",
            "isNegated": false,
            "isExact": false,
            "tokenCount": 3,
            "categoryDisplay": "<div>Cancer Research Ideas</div>",
            "record_type": "categoryDisplay"
        });

        let entry: BestBetMatch = serde_json::from_value(value).unwrap();

        assert!(entry.is_display());
        assert_eq!(entry.content_id, "1045389");
        assert_eq!(entry.token_count, 3);
        assert_eq!(entry.record_type, RecordType::CategoryDisplay);
        assert_eq!(
            entry.category_display.as_deref(),
            Some("<div>Cancer Research Ideas</div>")
        );
    }

    #[test]
    fn test_synonym_entry_omits_display() {
        let entry = BestBetMatch {
            content_id: "1045389".to_string(),
            category: "Cancer Research Ideas".to_string(),
            weight: 100,
            is_category: false,
            synonym: "Clinical Trial Ideas".to_string(),
            language: "en".to_string(),
            is_negated: false,
            is_exact: false,
            token_count: 3,
            category_display: None,
            record_type: RecordType::Synonym,
        };

        let value = serde_json::to_value(&entry).unwrap();

        assert!(value.get("categoryDisplay").is_none());
        assert_eq!(value["record_type"], "synonym");
        assert_eq!(value["contentID"], "1045389");
    }
}
