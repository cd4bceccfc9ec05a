//! Loader module for the best bets pipeline.
//!
//! Loads each category's match entries into their destination. Two loaders
//! share the same document transformation: the index rotation loader, which
//! publishes a freshly built index behind an alias, and the flat-file loader,
//! which writes the equivalent bulk actions to a file.

mod documents;
mod elastic;
mod file;
mod schema;

pub use documents::{build_category_documents, synonym_document_id, CategoryDocuments};
pub use elastic::ElasticBestBetsLoader;
pub use file::FileBestBetLoader;
pub use schema::load_schema;

use async_trait::async_trait;
use bestbets_shared::BestBetMatch;

use crate::config::LoaderConfig;
use crate::errors::LoaderError;

/// Lifecycle contract every loader implements.
///
/// A run is `begin`, any number of `load_record` calls, then `end`. When a run
/// cannot complete, the driver calls `abort` instead of `end` so the loader can
/// reclaim what `begin` created.
///
/// `load_record` takes `&self` and may run concurrently for different
/// categories. `begin`, `end`, and `abort` must not overlap with any other
/// call; the driver is responsible for that ordering.
#[async_trait]
pub trait RecordLoader: Send + Sync {
    /// Prepare the destination for a new run.
    async fn begin(&mut self) -> Result<(), LoaderError>;

    /// Load one category's match entries.
    async fn load_record(&self, matches: &[BestBetMatch]) -> Result<(), LoaderError>;

    /// Finish the run.
    async fn end(&mut self) -> Result<(), LoaderError>;

    /// Clean up after a run that cannot complete. Safe to call at any point.
    async fn abort(&mut self) -> Result<(), LoaderError>;
}

impl LoaderConfig {
    /// Build the configured loader.
    pub async fn into_loader(self) -> Result<Box<dyn RecordLoader>, LoaderError> {
        match self {
            Self::Elastic(config) => Ok(Box::new(ElasticBestBetsLoader::get_instance(&config).await?)),
            Self::File(config) => Ok(Box::new(FileBestBetLoader::get_instance(&config)?)),
        }
    }
}
