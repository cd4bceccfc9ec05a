//! # Best Bets Loader
//!
//! Main library for the best bets loader.
//!
//! This crate provides the entry point and configuration for running one
//! best bets load: reading the environment, installing the log subscriber,
//! and wiring the source and loader into the orchestrator.

pub mod config;

pub use config::{Dependencies, LoadSettings};

use bestbets_pipeline::{ConfigError, LoaderError, PipelineError};
use thiserror::Error;

/// Errors that can occur during loader initialization or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A loader setting was rejected.
    #[error("Configuration error: {0}")]
    InvalidSetting(#[from] ConfigError),

    /// The loader could not be built.
    #[error("Loader error: {0}")]
    LoaderError(#[from] LoaderError),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] PipelineError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
