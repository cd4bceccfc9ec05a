//! Orchestrator module for the best bets pipeline.
//!
//! Drives one load from a record source through the transformer into a
//! loader, and owns the policy for failed runs.

use std::future::Future;

use futures::{StreamExt, TryStreamExt};
use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::loader::RecordLoader;
use crate::source::RecordSource;
use crate::transformer::CategoryToMatchTransformer;

/// Categories loaded at once when no concurrency is configured.
pub const DEFAULT_LOAD_CONCURRENCY: usize = 8;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of categories loaded concurrently.
    pub concurrency: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_LOAD_CONCURRENCY,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub categories_loaded: usize,
}

/// Orchestrator that coordinates the pipeline components.
///
/// The orchestrator:
/// - Begins and ends the source and the loader around the run
/// - Transforms every category and loads it with bounded concurrency
/// - Stops at the first failure and aborts both sides, so `end` never
///   publishes a run with a failed category
pub struct Orchestrator {
    source: Box<dyn RecordSource>,
    transformer: CategoryToMatchTransformer,
    loader: Box<dyn RecordLoader>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(source: Box<dyn RecordSource>, loader: Box<dyn RecordLoader>) -> Self {
        Self::with_config(source, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        source: Box<dyn RecordSource>,
        loader: Box<dyn RecordLoader>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            source,
            transformer: CategoryToMatchTransformer::new(),
            loader,
            config,
        }
    }

    /// Run a complete load.
    pub async fn run(&mut self) -> Result<RunSummary, PipelineError> {
        self.run_until(futures::future::pending()).await
    }

    /// Run a complete load, treating `shutdown` completing as a failure.
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Every category loaded and both sides ended
    /// * `Err(PipelineError)` - The first failure; the run was aborted
    #[instrument(skip(self, shutdown), fields(concurrency = self.config.concurrency))]
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<RunSummary, PipelineError>
    where
        F: Future<Output = ()> + Send,
    {
        info!("Starting best bets load");

        self.source.begin().await?;
        if let Err(e) = self.loader.begin().await {
            error!(error = %e, "Loader failed to begin");
            self.abort_all().await;
            return Err(e.into());
        }

        let loaded = tokio::select! {
            biased;
            _ = shutdown => {
                warn!("Received shutdown signal");
                Err(PipelineError::Interrupted)
            }
            result = self.load_all() => result,
        };

        let result = match loaded {
            Ok(count) => self.end_all().await.map(|_| count),
            Err(e) => Err(e),
        };

        match result {
            Ok(categories_loaded) => {
                info!(categories_loaded, "Best bets load complete");
                Ok(RunSummary { categories_loaded })
            }
            Err(e) => {
                error!(error = %e, "Best bets load failed");
                self.abort_all().await;
                Err(e)
            }
        }
    }

    /// Transform and load every category, stopping at the first failure.
    async fn load_all(&self) -> Result<usize, PipelineError> {
        let records = self.source.records().await?;
        let loader = self.loader.as_ref();
        let transformer = self.transformer;

        records
            .map(|record| async move {
                let category = record?;
                let matches = transformer.transform(&category);
                loader.load_record(&matches).await.map_err(|e| {
                    error!(content_id = %category.category_id, error = %e, "Category failed to load");
                    PipelineError::from(e)
                })
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .try_fold(0usize, |count, _| async move { Ok(count + 1) })
            .await
    }

    async fn end_all(&mut self) -> Result<(), PipelineError> {
        self.loader.end().await?;
        self.source.end().await
    }

    /// Abort both sides, logging rather than returning cleanup failures.
    async fn abort_all(&mut self) {
        if let Err(e) = self.loader.abort().await {
            warn!(error = %e, "Failed to abort loader");
        }
        if let Err(e) = self.source.abort().await {
            warn!(error = %e, "Failed to abort source");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LoaderError;
    use crate::source::CategoryStream;
    use async_trait::async_trait;
    use bestbets_shared::{BestBetCategory, BestBetMatch, BestBetSynonym};
    use futures::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct MockSource {
        categories: Vec<Result<BestBetCategory, String>>,
        log: Log,
    }

    #[async_trait]
    impl RecordSource for MockSource {
        async fn begin(&mut self) -> Result<(), PipelineError> {
            self.log.lock().unwrap().push("source:begin".to_string());
            Ok(())
        }

        async fn records(&self) -> Result<CategoryStream, PipelineError> {
            let items: Vec<Result<BestBetCategory, PipelineError>> = self
                .categories
                .iter()
                .cloned()
                .map(|c| c.map_err(PipelineError::parse))
                .collect();
            Ok(stream::iter(items).boxed())
        }

        async fn end(&mut self) -> Result<(), PipelineError> {
            self.log.lock().unwrap().push("source:end".to_string());
            Ok(())
        }

        async fn abort(&mut self) -> Result<(), PipelineError> {
            self.log.lock().unwrap().push("source:abort".to_string());
            Ok(())
        }
    }

    struct MockLoader {
        fail_for: Option<String>,
        loaded: AtomicUsize,
        log: Log,
    }

    #[async_trait]
    impl RecordLoader for MockLoader {
        async fn begin(&mut self) -> Result<(), LoaderError> {
            self.log.lock().unwrap().push("loader:begin".to_string());
            Ok(())
        }

        async fn load_record(&self, matches: &[BestBetMatch]) -> Result<(), LoaderError> {
            let content_id = matches[0].content_id.clone();
            if self.fail_for.as_deref() == Some(content_id.as_str()) {
                return Err(LoaderError::DuplicateData { content_id });
            }
            self.loaded.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn end(&mut self) -> Result<(), LoaderError> {
            self.log.lock().unwrap().push("loader:end".to_string());
            Ok(())
        }

        async fn abort(&mut self) -> Result<(), LoaderError> {
            self.log.lock().unwrap().push("loader:abort".to_string());
            Ok(())
        }
    }

    fn category(id: &str) -> BestBetCategory {
        BestBetCategory {
            category_id: id.to_string(),
            category_name: format!("Category {}", id),
            category_weight: 10,
            is_exact_match: false,
            language: "en".to_string(),
            display: true,
            include_synonyms: vec![BestBetSynonym::new("term", false)],
            exclude_synonyms: vec![],
            category_display: "<div></div>".to_string(),
        }
    }

    fn orchestrator(
        categories: Vec<Result<BestBetCategory, String>>,
        fail_for: Option<&str>,
    ) -> (Orchestrator, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let source = MockSource {
            categories,
            log: log.clone(),
        };
        let loader = MockLoader {
            fail_for: fail_for.map(str::to_string),
            loaded: AtomicUsize::new(0),
            log: log.clone(),
        };
        let config = OrchestratorConfig { concurrency: 2 };
        (
            Orchestrator::with_config(Box::new(source), Box::new(loader), config),
            log,
        )
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_run_loads_every_category() {
        let categories = (1..=5).map(|i| Ok(category(&i.to_string()))).collect();
        let (mut orchestrator, log) = orchestrator(categories, None);

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary.categories_loaded, 5);
        assert_eq!(
            entries(&log),
            vec!["source:begin", "loader:begin", "loader:end", "source:end"]
        );
    }

    #[tokio::test]
    async fn test_run_with_no_categories_still_ends() {
        let (mut orchestrator, log) = orchestrator(vec![], None);

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary.categories_loaded, 0);
        assert!(entries(&log).contains(&"loader:end".to_string()));
    }

    #[tokio::test]
    async fn test_failed_category_aborts_the_run() {
        let categories = vec![Ok(category("1")), Ok(category("2")), Ok(category("3"))];
        let (mut orchestrator, log) = orchestrator(categories, Some("2"));

        let err = orchestrator.run().await.unwrap_err();

        assert_eq!(err.to_string(), "Category 2 appears to have duplicates");
        let log = entries(&log);
        assert!(!log.contains(&"loader:end".to_string()));
        assert!(log.contains(&"loader:abort".to_string()));
        assert!(log.contains(&"source:abort".to_string()));
    }

    #[tokio::test]
    async fn test_source_error_aborts_the_run() {
        let categories = vec![Ok(category("1")), Err("bad file".to_string())];
        let (mut orchestrator, log) = orchestrator(categories, None);

        let err = orchestrator.run().await.unwrap_err();

        assert!(matches!(err, PipelineError::ParseError(_)));
        assert!(entries(&log).contains(&"loader:abort".to_string()));
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_the_run() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let source = MockSource {
            categories: vec![Ok(category("1"))],
            log: log.clone(),
        };
        let loader = MockLoader {
            fail_for: None,
            loaded: AtomicUsize::new(0),
            log: log.clone(),
        };
        let mut orchestrator = Orchestrator::new(Box::new(source), Box::new(loader));

        let result = orchestrator.run_until(async {}).await;

        assert!(matches!(result, Err(PipelineError::Interrupted)));
        let log = entries(&log);
        assert!(log.contains(&"loader:abort".to_string()));
        assert!(!log.contains(&"loader:end".to_string()));
    }
}
