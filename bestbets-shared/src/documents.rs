//! Documents written into the best bets index.
//!
//! Field names follow the index mapping in `es-mappings/mappings.json`.

use serde::{Deserialize, Serialize};

use crate::matches::BestBetMatch;

/// The document carrying a category's display payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDisplayDocument {
    pub contentid: String,
    pub name: String,
    pub weight: i64,
    pub content: String,
}

impl CategoryDisplayDocument {
    /// Build the display document from a category's display entry.
    pub fn from_match(entry: &BestBetMatch) -> Self {
        Self {
            contentid: entry.content_id.clone(),
            name: entry.category.clone(),
            weight: entry.weight,
            content: entry.category_display.clone().unwrap_or_default(),
        }
    }
}

/// One synonym document of a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymDocument {
    pub category: String,
    pub contentid: String,
    pub synonym: String,
    pub language: String,
    pub is_negated: bool,
    pub is_exact: bool,
    pub tokencount: u32,
}

impl SynonymDocument {
    /// Build a synonym document from a match entry.
    pub fn from_match(entry: &BestBetMatch) -> Self {
        Self {
            category: entry.category.clone(),
            contentid: entry.content_id.clone(),
            synonym: entry.synonym.clone(),
            language: entry.language.clone(),
            is_negated: entry.is_negated,
            is_exact: entry.is_exact,
            tokencount: entry.token_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::RecordType;

    fn entry(is_category: bool) -> BestBetMatch {
        BestBetMatch {
            content_id: "1045389".to_string(),
            category: "Cancer Research Ideas".to_string(),
            weight: 100,
            is_category,
            synonym: "Clinical Trial Ideas".to_string(),
            language: "en".to_string(),
            is_negated: true,
            is_exact: false,
            token_count: 3,
            category_display: is_category.then(|| "<div/>".to_string()),
            record_type: if is_category {
                RecordType::CategoryDisplay
            } else {
                RecordType::Synonym
            },
        }
    }

    #[test]
    fn test_category_display_document() {
        let doc = CategoryDisplayDocument::from_match(&entry(true));

        assert_eq!(doc.contentid, "1045389");
        assert_eq!(doc.name, "Cancer Research Ideas");
        assert_eq!(doc.weight, 100);
        assert_eq!(doc.content, "<div/>");
    }

    #[test]
    fn test_synonym_document_field_names() {
        let doc = SynonymDocument::from_match(&entry(false));
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["contentid"], "1045389");
        assert_eq!(value["synonym"], "Clinical Trial Ideas");
        assert_eq!(value["is_negated"], true);
        assert_eq!(value["is_exact"], false);
        assert_eq!(value["tokencount"], 3);
    }
}
