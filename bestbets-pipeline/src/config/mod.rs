//! Configuration for the pipeline components.
//!
//! Each component has an explicit configuration struct whose `Option` fields
//! mirror the recognized configuration keys. Validation is pure: `validate`
//! accumulates every problem, `check` stops at the first.

mod elastic;
mod file;
mod source;

pub use elastic::{
    validate_config, ElasticLoaderConfig, RotationSettings, DEFAULT_DAYS_TO_KEEP,
    DEFAULT_MIN_INDEXES_TO_KEEP,
};
pub use file::FileLoaderConfig;
pub use source::{SourceConfig, DEFAULT_CONTENT_PATH};

use crate::errors::ConfigError;

/// Selects which loader a run uses.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderConfig {
    /// Rotate a fresh index in behind the alias.
    Elastic(ElasticLoaderConfig),
    /// Write a bulk-format file instead of calling the engine.
    File(FileLoaderConfig),
}

impl LoaderConfig {
    /// Validate the selected loader's configuration.
    pub fn validate(&self) -> Vec<ConfigError> {
        match self {
            Self::Elastic(config) => config.validate(),
            Self::File(config) => config.validate(),
        }
    }
}
