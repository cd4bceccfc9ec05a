//! Transformer module for the best bets pipeline.
//!
//! Flattens a category into the match entries a loader consumes: one entry
//! marking the category itself, then one per synonym.

use bestbets_shared::{BestBetCategory, BestBetMatch, BestBetSynonym, RecordType};
use tracing::trace;

/// Turns a category into its list of match entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryToMatchTransformer;

impl CategoryToMatchTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Flatten a category.
    ///
    /// # Returns
    ///
    /// The category entry (carrying the display payload) first, then the
    /// include synonyms, then the exclude synonyms marked as negated.
    pub fn transform(&self, category: &BestBetCategory) -> Vec<BestBetMatch> {
        let mut matches =
            Vec::with_capacity(1 + category.include_synonyms.len() + category.exclude_synonyms.len());

        matches.push(BestBetMatch {
            content_id: category.category_id.clone(),
            category: category.category_name.clone(),
            weight: category.category_weight,
            is_category: true,
            synonym: category.category_name.clone(),
            language: category.language.clone(),
            is_negated: false,
            is_exact: category.is_exact_match,
            token_count: token_count(&category.category_name),
            category_display: Some(category.category_display.clone()),
            record_type: RecordType::CategoryDisplay,
        });

        matches.extend(
            category
                .include_synonyms
                .iter()
                .map(|synonym| synonym_match(category, synonym, false)),
        );
        matches.extend(
            category
                .exclude_synonyms
                .iter()
                .map(|synonym| synonym_match(category, synonym, true)),
        );

        trace!(
            content_id = %category.category_id,
            match_count = matches.len(),
            "Transformed category"
        );
        matches
    }
}

fn synonym_match(category: &BestBetCategory, synonym: &BestBetSynonym, is_negated: bool) -> BestBetMatch {
    BestBetMatch {
        content_id: category.category_id.clone(),
        category: category.category_name.clone(),
        weight: category.category_weight,
        is_category: false,
        synonym: synonym.name.clone(),
        language: category.language.clone(),
        is_negated,
        is_exact: synonym.is_exact_match,
        token_count: token_count(&synonym.name),
        category_display: None,
        record_type: RecordType::Synonym,
    }
}

/// Number of alphanumeric word runs in `text`.
pub fn token_count(text: &str) -> u32 {
    let count = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
