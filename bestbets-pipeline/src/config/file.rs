//! Configuration for the flat-file export loader.

use serde::Deserialize;

use crate::errors::ConfigError;

const COMPONENT: &str = "FileBestBetLoader";

/// Configuration of the flat-file export loader.
///
/// The document types are only needed when the generated file targets a
/// search engine that still requires a `_type` per document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileLoaderConfig {
    /// File the bulk actions are written to.
    pub output_file: Option<String>,
    /// Index named in every bulk action.
    pub index_name: Option<String>,
    /// Used as `index_name` when that is unset.
    pub alias_name: Option<String>,
    /// `_type` of category display documents.
    pub category_display_document_type: Option<String>,
    /// `_type` of synonym documents.
    pub synonyms_document_type: Option<String>,
}

impl FileLoaderConfig {
    /// The index named in bulk actions: `indexName`, falling back to `aliasName`.
    pub fn effective_index_name(&self) -> Option<&str> {
        self.index_name
            .as_deref()
            .or(self.alias_name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    /// Every problem with this configuration.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self
            .output_file
            .as_deref()
            .map_or(true, |file| file.trim().is_empty())
        {
            errors.push(ConfigError::required("outputFile", COMPONENT));
        }

        if self.effective_index_name().is_none() {
            errors.push(ConfigError::required("indexName", COMPONENT));
        }

        errors
    }

    /// The first problem with this configuration, if any.
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.validate().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
