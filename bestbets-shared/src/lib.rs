//! # Best Bets Shared
//!
//! Data model shared by the best bets loader crates: the curated categories
//! produced by a record source, the flattened match entries a loader consumes,
//! and the documents written into the search index.

pub mod category;
pub mod documents;
pub mod matches;

pub use category::{BestBetCategory, BestBetSynonym};
pub use documents::{CategoryDisplayDocument, SynonymDocument};
pub use matches::{BestBetMatch, RecordType};
