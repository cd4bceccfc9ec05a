//! Source reading one JSON category file per best bet from a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bestbets_shared::{BestBetCategory, BestBetSynonym};
use futures::{stream, StreamExt, TryStreamExt};
use tokio_stream::wrappers::ReadDirStream;
use tracing::{debug, error, instrument};

use crate::config::SourceConfig;
use crate::errors::{ConfigError, PipelineError};
use crate::source::{CategoryStream, RecordSource};

/// Reads `*.json` category files directly inside a content directory.
#[derive(Debug, Clone)]
pub struct FileSystemBestBetsSource {
    content_path: PathBuf,
}

impl FileSystemBestBetsSource {
    /// Create a source for a checked configuration.
    pub fn new(config: &SourceConfig) -> Result<Self, ConfigError> {
        if let Some(err) = config.validate().into_iter().next() {
            return Err(err);
        }

        Ok(Self {
            content_path: PathBuf::from(config.content_path.trim()),
        })
    }

    /// Validate a configuration for this source.
    pub fn validate_config(config: &SourceConfig) -> Vec<ConfigError> {
        config.validate()
    }

    pub fn content_path(&self) -> &Path {
        &self.content_path
    }

    /// The category files to read, sorted by name.
    async fn content_list(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let read_dir = tokio::fs::read_dir(&self.content_path).await.map_err(|e| {
            error!(path = %self.content_path.display(), error = %e, "Could not list content");
            PipelineError::source(format!(
                "Could not fetch resources from '{}': {}",
                self.content_path.display(),
                e
            ))
        })?;

        let entries: Vec<tokio::fs::DirEntry> = ReadDirStream::new(read_dir)
            .try_collect()
            .await
            .map_err(|e| PipelineError::source(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| PipelineError::source(e.to_string()))?
                .is_file();
            if is_file && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }
}

#[async_trait]
impl RecordSource for FileSystemBestBetsSource {
    #[instrument(skip(self), fields(content_path = %self.content_path.display()))]
    async fn records(&self) -> Result<CategoryStream, PipelineError> {
        let files = self.content_list().await?;
        debug!(file_count = files.len(), "Listed category files");

        Ok(stream::iter(files).then(read_category).boxed())
    }
}

async fn read_category(path: PathBuf) -> Result<BestBetCategory, PipelineError> {
    let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "Could not read category file");
        PipelineError::source(format!("Could not fetch {}", path.display()))
    })?;

    let category: BestBetCategory = serde_json::from_str(&contents).map_err(|e| {
        PipelineError::parse(format!("Cannot process {}: {}", path.display(), e))
    })?;

    clean_category(category, &path)
}

/// Trim text fields and normalize the language of a parsed category.
fn clean_category(category: BestBetCategory, path: &Path) -> Result<BestBetCategory, PipelineError> {
    let language = normalize_language(&category.language).ok_or_else(|| {
        PipelineError::parse(format!(
            "Invalid BestBets Category, {}, language is empty or unknown",
            path.display()
        ))
    })?;

    Ok(BestBetCategory {
        category_id: category.category_id.trim().to_string(),
        category_name: category.category_name.trim().to_string(),
        language: language.to_string(),
        include_synonyms: clean_synonyms(category.include_synonyms),
        exclude_synonyms: clean_synonyms(category.exclude_synonyms),
        category_display: category.category_display.trim().to_string(),
        ..category
    })
}

fn clean_synonyms(synonyms: Vec<BestBetSynonym>) -> Vec<BestBetSynonym> {
    synonyms
        .into_iter()
        .map(|synonym| BestBetSynonym::new(synonym.name.trim(), synonym.is_exact_match))
        .collect()
}

/// Map the language spellings found in content to an ISO 639-1 code.
pub fn normalize_language(language: &str) -> Option<&'static str> {
    match language.trim().to_lowercase().as_str() {
        "en" | "eng" | "en-us" => Some("en"),
        "es" | "esp" | "es-us" => Some("es"),
        _ => None,
    }
}
