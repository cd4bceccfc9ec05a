//! Error types for the best bets pipeline.

mod config_error;
mod loader_error;

pub use config_error::{ConfigError, ConfigErrorKind};
pub use loader_error::LoaderError;

use thiserror::Error;

/// Errors that can occur while running the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from the record source.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Error parsing or decoding a record.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// Error from the loader component.
    #[error(transparent)]
    LoaderError(#[from] LoaderError),

    /// The run was stopped by a shutdown signal.
    #[error("Run interrupted before completion")]
    Interrupted,
}

impl PipelineError {
    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
