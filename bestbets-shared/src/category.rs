//! Best bet categories as produced by a record source.

use serde::{Deserialize, Serialize};

/// A single synonym attached to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestBetSynonym {
    /// The synonym text.
    pub name: String,
    /// Whether the synonym only matches the exact query text.
    #[serde(default)]
    pub is_exact_match: bool,
}

impl BestBetSynonym {
    /// Create a synonym.
    pub fn new(name: impl Into<String>, is_exact_match: bool) -> Self {
        Self {
            name: name.into(),
            is_exact_match,
        }
    }
}

/// One editorially curated best bet category.
///
/// A category carries its display payload (an HTML fragment shown above search
/// results), a weight used to boost it, and the synonym terms that should and
/// should not trigger it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestBetCategory {
    /// Stable identifier of the category.
    pub category_id: String,
    /// Display name of the category.
    pub category_name: String,
    /// Numeric boost.
    pub category_weight: i64,
    /// Whether the category name only matches the exact query text.
    #[serde(default)]
    pub is_exact_match: bool,
    /// Normalized ISO 639-1 language code.
    pub language: String,
    /// Whether the category is meant to be displayed.
    #[serde(default)]
    pub display: bool,
    /// Terms that trigger the category.
    #[serde(default)]
    pub include_synonyms: Vec<BestBetSynonym>,
    /// Terms that suppress the category.
    #[serde(default)]
    pub exclude_synonyms: Vec<BestBetSynonym>,
    /// HTML fragment displayed for the category.
    #[serde(default)]
    pub category_display: String,
}
