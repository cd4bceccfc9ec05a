//! Record sources for the best bets pipeline.
//!
//! A source produces the curated categories a run loads. Sources follow the
//! same lifecycle as loaders so the orchestrator can begin, end, or abort both
//! sides of a run together.

mod filesystem;

pub use filesystem::{normalize_language, FileSystemBestBetsSource};

use async_trait::async_trait;
use bestbets_shared::BestBetCategory;
use futures::stream::BoxStream;

use crate::errors::PipelineError;

/// A stream of categories, each possibly failing on its own.
pub type CategoryStream = BoxStream<'static, Result<BestBetCategory, PipelineError>>;

/// Provides the categories for a run.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Called before any record is requested.
    async fn begin(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// The categories to load.
    async fn records(&self) -> Result<CategoryStream, PipelineError>;

    /// Called after every record was loaded.
    async fn end(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Called when the run fails.
    async fn abort(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}
