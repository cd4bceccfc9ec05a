//! Loader error types.
//!
//! Per-category failures (`NoMatches`, `MissingDisplay`, `Indexing`,
//! `DuplicateData`) are returned from `load_record` and never retried by the
//! loader; run-boundary failures are fatal to the run.

use std::path::PathBuf;

use bestbets_repository::SearchIndexError;
use thiserror::Error;

use super::ConfigError;

/// Errors that can occur while loading best bets.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Missing or invalid loader setting.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A schema file named by the configuration could not be read or parsed.
    #[error("{setting} cannot be loaded: {}", .path.display())]
    ResourceLoad { setting: &'static str, path: PathBuf },

    /// A category produced no match entries.
    #[error("A category resulted in 0 matches")]
    NoMatches,

    /// None of a category's match entries carries the display payload.
    #[error("Category {content_id} is missing its display")]
    MissingDisplay { content_id: String },

    /// The search engine rejected one or more of a category's documents.
    #[error("Category {content_id} had document errors")]
    Indexing { content_id: String },

    /// A document of the category overwrote another within the same run.
    #[error("Category {content_id} appears to have duplicates")]
    DuplicateData { content_id: String },

    /// A run operation was called before `begin`.
    #[error("{operation} called before begin")]
    NotStarted { operation: &'static str },

    /// `begin` was called on a loader whose run already started.
    #[error("begin called more than once")]
    AlreadyStarted,

    /// The index manager failed.
    #[error("Search error: {0}")]
    Search(#[from] SearchIndexError),

    /// Failed to serialize a document.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoaderError {
    /// The category the error is about, for per-category failures.
    pub fn content_id(&self) -> Option<&str> {
        match self {
            Self::MissingDisplay { content_id }
            | Self::Indexing { content_id }
            | Self::DuplicateData { content_id } => Some(content_id),
            _ => None,
        }
    }
}
