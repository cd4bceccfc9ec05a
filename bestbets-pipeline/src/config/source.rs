//! Configuration for the filesystem record source.

use serde::Deserialize;

use crate::errors::ConfigError;

/// Directory read when `contentPath` is unset.
pub const DEFAULT_CONTENT_PATH: &str = "/content";

/// Configuration of the filesystem record source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Directory holding one JSON file per category.
    #[serde(default = "default_content_path")]
    pub content_path: String,
}

fn default_content_path() -> String {
    DEFAULT_CONTENT_PATH.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            content_path: default_content_path(),
        }
    }
}

impl SourceConfig {
    /// Every problem with this configuration.
    pub fn validate(&self) -> Vec<ConfigError> {
        if self.content_path.trim().is_empty() {
            return vec![ConfigError::invalid(
                "contentPath",
                "You must supply a file system path.",
            )];
        }
        Vec::new()
    }
}
