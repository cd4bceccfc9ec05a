//! Configuration validation errors.

use thiserror::Error;

/// Why a configuration value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// A required value is absent or empty.
    Missing,
    /// A value is present but unusable.
    Invalid,
}

/// A rejected configuration value.
///
/// `field` is the configuration key as written in config files (`aliasName`,
/// `socketLimit`, ...). Displays as the message alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigError {
    pub field: &'static str,
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    /// A required value is missing for the named component.
    pub fn required(field: &'static str, component: &str) -> Self {
        Self {
            field,
            kind: ConfigErrorKind::Missing,
            message: format!("{} is required for the {}", field, component),
        }
    }

    /// A value is present but invalid.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: ConfigErrorKind::Invalid,
            message: message.into(),
        }
    }
}
