//! Interface definitions for index management.
//!
//! This module defines the abstract `IndexManager` trait that allows
//! for dependency injection and swappable search backend implementations.

mod index_manager;

pub use index_manager::IndexManager;
