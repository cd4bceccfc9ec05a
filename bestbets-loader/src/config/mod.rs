//! Configuration and dependency wiring for the best bets loader.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{LoadSettings, LogFormat};
