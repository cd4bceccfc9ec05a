//! Turns a category's match entries into the documents a loader writes.

use bestbets_shared::{BestBetMatch, CategoryDisplayDocument, SynonymDocument};

use crate::errors::LoaderError;

/// The documents produced for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDocuments {
    /// Identifier of the category, also the display document's ID.
    pub content_id: String,
    /// The category display document.
    pub display: CategoryDisplayDocument,
    /// Synonym documents with their IDs, one per match entry.
    pub synonyms: Vec<(String, SynonymDocument)>,
}

/// ID of the synonym document built from the entry at `position`.
///
/// Uses format: `{content_id}_{position}` where `position` is the entry's
/// index in the category's match list, so IDs are unique within a category
/// even when synonym texts collide.
pub fn synonym_document_id(content_id: &str, position: usize) -> String {
    format!("{}_{}", content_id, position)
}

/// Split a category's matches into its display document and synonym documents.
///
/// The first entry marked `is_category` also becomes the display document.
/// Every entry, the category entry included, becomes a synonym document keyed
/// by its position, so the category name matches its own category.
///
/// # Errors
///
/// * `LoaderError::NoMatches` - If `matches` is empty
/// * `LoaderError::MissingDisplay` - If no entry is marked `is_category`
pub fn build_category_documents(
    matches: &[BestBetMatch],
) -> Result<CategoryDocuments, LoaderError> {
    let Some(first) = matches.first() else {
        return Err(LoaderError::NoMatches);
    };

    let Some(display_position) = matches.iter().position(BestBetMatch::is_display) else {
        return Err(LoaderError::MissingDisplay {
            content_id: first.content_id.clone(),
        });
    };

    let display_entry = &matches[display_position];

    let synonyms = matches
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            (
                synonym_document_id(&entry.content_id, position),
                SynonymDocument::from_match(entry),
            )
        })
        .collect();

    Ok(CategoryDocuments {
        content_id: display_entry.content_id.clone(),
        display: CategoryDisplayDocument::from_match(display_entry),
        synonyms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestbets_shared::RecordType;

    fn entry(is_category: bool, synonym: &str) -> BestBetMatch {
        BestBetMatch {
            content_id: "1045389".to_string(),
            category: "Cancer Research Ideas".to_string(),
            weight: 100,
            is_category,
            synonym: synonym.to_string(),
            language: "en".to_string(),
            is_negated: false,
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
    fn test_empty_matches() {
        let err = build_category_documents(&[]).unwrap_err();
        assert!(matches!(err, LoaderError::NoMatches));
        assert_eq!(err.to_string(), "A category resulted in 0 matches");
    }

    #[test]
    fn test_missing_display() {
        let err = build_category_documents(&[entry(false, "ideas")]).unwrap_err();
        assert_eq!(err.to_string(), "Category 1045389 is missing its display");
    }

    #[test]
    fn test_partition_and_keys() {
        let matches = vec![
            entry(true, "Cancer Research Ideas"),
            entry(false, "Clinical Trial Ideas"),
            entry(false, "Clinical Trial Ideas"),
        ];

        let docs = build_category_documents(&matches).unwrap();

        assert_eq!(docs.content_id, "1045389");
        assert_eq!(docs.display.content, "<div/>");
        let ids: Vec<&str> = docs.synonyms.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["1045389_0", "1045389_1", "1045389_2"]);
        assert_eq!(docs.synonyms[0].1.synonym, "Cancer Research Ideas");
    }

    #[test]
    fn test_display_entry_not_first() {
        let matches = vec![entry(false, "ideas"), entry(true, "Cancer Research Ideas")];

        let docs = build_category_documents(&matches).unwrap();

        assert_eq!(docs.synonyms.len(), 2);
        assert_eq!(docs.synonyms[0].0, "1045389_0");
        assert_eq!(docs.synonyms[0].1.synonym, "ideas");
        assert_eq!(docs.synonyms[1].0, "1045389_1");
    }

    #[test]
    fn test_display_only() {
        let docs = build_category_documents(&[entry(true, "Cancer Research Ideas")]).unwrap();

        assert_eq!(docs.synonyms.len(), 1);
        assert_eq!(docs.synonyms[0].0, "1045389_0");
    }
}
