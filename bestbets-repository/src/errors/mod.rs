//! Error types for the best bets repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
