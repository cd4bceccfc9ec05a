//! # Best Bets Pipeline
//!
//! This crate provides the pipeline components that load editorially curated
//! best bet categories into a search engine.
//!
//! ## Architecture
//!
//! The pipeline follows the Source-Transformer-Loader pattern:
//!
//! 1. **Source**: Reads best bet categories
//! 2. **Transformer**: Flattens each category into match entries
//! 3. **Loader**: Writes each category's documents, either into a freshly
//!    rotated index or to a bulk-format file
//! 4. **Orchestrator**: Drives the run and aborts it on the first failure

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod source;
pub mod transformer;

pub use config::{ElasticLoaderConfig, FileLoaderConfig, LoaderConfig, SourceConfig};
pub use errors::{ConfigError, LoaderError, PipelineError};
pub use loader::{ElasticBestBetsLoader, FileBestBetLoader, RecordLoader};
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunSummary};
pub use source::{FileSystemBestBetsSource, RecordSource};
pub use transformer::CategoryToMatchTransformer;
