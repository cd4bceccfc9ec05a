//! Flat-file export loader.
//!
//! Writes the same documents the rotation loader would index, as
//! newline-delimited bulk actions, so a load can be inspected or replayed
//! against an engine later.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bestbets_shared::BestBetMatch;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::FileLoaderConfig;
use crate::errors::{ConfigError, LoaderError};
use crate::loader::documents::{build_category_documents, CategoryDocuments};
use crate::loader::RecordLoader;

enum OutputState {
    Unopened,
    Open(BufWriter<File>),
    Closed,
    Aborted,
}

/// Loader that appends bulk actions to a file instead of calling the engine.
pub struct FileBestBetLoader {
    output_file: PathBuf,
    index_name: String,
    category_display_document_type: Option<String>,
    synonyms_document_type: Option<String>,
    output: Mutex<OutputState>,
}

impl FileBestBetLoader {
    /// Create a loader from a checked configuration.
    pub fn get_instance(config: &FileLoaderConfig) -> Result<Self, LoaderError> {
        config.check()?;

        let index_name = config
            .effective_index_name()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::required("indexName", "FileBestBetLoader"))?;

        Ok(Self {
            output_file: PathBuf::from(config.output_file.clone().unwrap_or_default()),
            index_name,
            category_display_document_type: config.category_display_document_type.clone(),
            synonyms_document_type: config.synonyms_document_type.clone(),
            output: Mutex::new(OutputState::Unopened),
        })
    }

    /// Validate a configuration for this loader.
    pub fn validate_config(config: &FileLoaderConfig) -> Vec<ConfigError> {
        config.validate()
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Render one category as bulk action lines, display document first.
    pub fn render_bulk_lines(&self, documents: &CategoryDocuments) -> Result<String, LoaderError> {
        let mut lines = String::new();

        self.push_action(
            &mut lines,
            &documents.content_id,
            self.category_display_document_type.as_deref(),
            &documents.display,
        )?;
        for (id, synonym) in &documents.synonyms {
            self.push_action(
                &mut lines,
                id,
                self.synonyms_document_type.as_deref(),
                synonym,
            )?;
        }

        Ok(lines)
    }

    fn push_action<T: Serialize>(
        &self,
        lines: &mut String,
        id: &str,
        doc_type: Option<&str>,
        document: &T,
    ) -> Result<(), LoaderError> {
        let mut meta = Map::new();
        meta.insert("_index".to_string(), Value::String(self.index_name.clone()));
        meta.insert("_id".to_string(), Value::String(id.to_string()));
        if let Some(doc_type) = doc_type {
            meta.insert("_type".to_string(), Value::String(doc_type.to_string()));
        }

        lines.push_str(&serde_json::to_string(&json!({ "index": meta }))?);
        lines.push('\n');
        lines.push_str(&serde_json::to_string(document)?);
        lines.push('\n');
        Ok(())
    }
}

#[async_trait]
impl RecordLoader for FileBestBetLoader {
    /// Create or truncate the output file.
    #[instrument(skip(self), fields(output_file = %self.output_file.display()))]
    async fn begin(&mut self) -> Result<(), LoaderError> {
        let mut output = self.output.lock().await;
        if !matches!(*output, OutputState::Unopened) {
            return Err(LoaderError::AlreadyStarted);
        }

        let file = File::create(&self.output_file).await?;
        *output = OutputState::Open(BufWriter::new(file));

        info!("Opened output file");
        Ok(())
    }

    #[instrument(skip(self, matches), fields(match_count = matches.len()))]
    async fn load_record(&self, matches: &[BestBetMatch]) -> Result<(), LoaderError> {
        let mut output = self.output.lock().await;
        let OutputState::Open(writer) = &mut *output else {
            return Err(LoaderError::NotStarted {
                operation: "load_record",
            });
        };

        let documents = build_category_documents(matches)?;
        let lines = self.render_bulk_lines(&documents)?;
        writer.write_all(lines.as_bytes()).await?;

        debug!(content_id = %documents.content_id, "Category written");
        Ok(())
    }

    /// Flush and close the output file.
    #[instrument(skip(self), fields(output_file = %self.output_file.display()))]
    async fn end(&mut self) -> Result<(), LoaderError> {
        let mut output = self.output.lock().await;
        let OutputState::Open(writer) = &mut *output else {
            return Err(LoaderError::NotStarted { operation: "end" });
        };

        writer.flush().await?;
        writer.shutdown().await?;
        *output = OutputState::Closed;

        info!("Closed output file");
        Ok(())
    }

    /// Close and remove a partially written output file.
    #[instrument(skip(self), fields(output_file = %self.output_file.display()))]
    async fn abort(&mut self) -> Result<(), LoaderError> {
        let mut output = self.output.lock().await;
        if !matches!(*output, OutputState::Open(_)) {
            debug!("Nothing to clean up");
            return Ok(());
        }

        // Drop the writer before removing the file
        *output = OutputState::Aborted;
        tokio::fs::remove_file(&self.output_file).await?;

        warn!("Aborted run and removed the partial output file");
        Ok(())
    }
}
