//! Index rotation loader.
//!
//! Every run builds a brand-new physical index, validates each category as it
//! is written, and only then publishes the index by pointing the alias at it
//! and pruning stale indices. Readers of the alias never see a partial load.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bestbets_repository::{
    BulkDocument, IndexManager, IndexManagerConfig, OpenSearchIndexManager,
};
use bestbets_shared::BestBetMatch;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{validate_config, ElasticLoaderConfig};
use crate::errors::{ConfigError, LoaderError};
use crate::loader::documents::build_category_documents;
use crate::loader::schema::load_schema;
use crate::loader::RecordLoader;

/// Where a loader is in its run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RunState {
    /// `begin` has not run.
    Uninitialized,
    /// The run's index exists and is being loaded.
    Active { index_name: String },
    /// The alias points at the run's index.
    Complete { index_name: String },
    /// The run's index was removed.
    Aborted,
}

/// Loader that publishes best bets through index rotation.
///
/// The loader is responsible for:
/// - Creating a timestamped index for the run
/// - Writing each category's display and synonym documents, rejecting
///   categories the engine refused or that contain duplicate entries
/// - Optimizing the index, swapping the alias onto it, and pruning old indices
pub struct ElasticBestBetsLoader {
    index_manager: Arc<dyn IndexManager>,
    mappings: Value,
    settings: Value,
    alias_name: String,
    days_to_keep: u32,
    min_indexes_to_keep: u32,
    state: RunState,
}

impl ElasticBestBetsLoader {
    /// Create a loader around an index manager and already loaded schemas.
    ///
    /// Only the rotation settings (`aliasName`, `daysToKeep`,
    /// `minIndexesToKeep`) are checked here, failing on the first problem.
    pub fn new(
        index_manager: Arc<dyn IndexManager>,
        mappings: Value,
        settings: Value,
        config: &ElasticLoaderConfig,
    ) -> Result<Self, LoaderError> {
        let rotation = config.rotation_settings()?;

        Ok(Self {
            index_manager,
            mappings,
            settings,
            alias_name: rotation.alias_name,
            days_to_keep: rotation.days_to_keep,
            min_indexes_to_keep: rotation.min_indexes_to_keep,
            state: RunState::Uninitialized,
        })
    }

    /// Validate a configuration for this loader. See [`validate_config`].
    pub fn validate_config(config: &ElasticLoaderConfig) -> Vec<ConfigError> {
        validate_config(config)
    }

    /// Build a loader from configuration.
    ///
    /// Relative schema paths resolve against the working directory.
    pub async fn get_instance(config: &ElasticLoaderConfig) -> Result<Self, LoaderError> {
        let root = std::env::current_dir()?;
        Self::get_instance_in(&root, config).await
    }

    /// Build a loader from configuration, resolving relative schema paths against `root`.
    ///
    /// The whole configuration is checked first, before any file or network
    /// activity. The index manager's connection pool is sized by `socketLimit`.
    pub async fn get_instance_in(
        root: &Path,
        config: &ElasticLoaderConfig,
    ) -> Result<Self, LoaderError> {
        config.check()?;

        let mapping_path = root.join(config.mapping_path.as_deref().unwrap_or_default());
        let settings_path = root.join(config.settings_path.as_deref().unwrap_or_default());

        let mappings = load_schema("mappingPath", &mapping_path).await?;
        let settings = load_schema("settingsPath", &settings_path).await?;

        let mut manager_config = IndexManagerConfig::new(config.eshosts.clone().unwrap_or_default());
        if let Some(socket_limit) = config.socket_limit_size() {
            manager_config = manager_config.with_socket_limit(socket_limit);
        }
        let index_manager = OpenSearchIndexManager::new(manager_config).await?;

        Self::new(Arc::new(index_manager), mappings, settings, config)
    }

    /// The stable published name.
    pub fn alias_name(&self) -> &str {
        &self.alias_name
    }

    /// Age in days after which old indices are pruned.
    pub fn days_to_keep(&self) -> u32 {
        self.days_to_keep
    }

    /// Number of newest indices cleanup always keeps.
    pub fn min_indexes_to_keep(&self) -> u32 {
        self.min_indexes_to_keep
    }

    /// The index mappings blob.
    pub fn mappings(&self) -> &Value {
        &self.mappings
    }

    /// The index settings blob.
    pub fn settings(&self) -> &Value {
        &self.settings
    }

    /// Name of the index created by `begin`, once it exists.
    pub fn index_name(&self) -> Option<&str> {
        match &self.state {
            RunState::Active { index_name } | RunState::Complete { index_name } => {
                Some(index_name)
            }
            RunState::Uninitialized | RunState::Aborted => None,
        }
    }

    /// The index being loaded, or `NotStarted` outside an active run.
    fn active_index(&self, operation: &'static str) -> Result<&str, LoaderError> {
        match &self.state {
            RunState::Active { index_name } => Ok(index_name),
            _ => Err(LoaderError::NotStarted { operation }),
        }
    }
}

#[async_trait]
impl RecordLoader for ElasticBestBetsLoader {
    /// Create the run's index from the configured mappings and settings.
    #[instrument(skip(self), fields(alias = %self.alias_name))]
    async fn begin(&mut self) -> Result<(), LoaderError> {
        if self.state != RunState::Uninitialized {
            return Err(LoaderError::AlreadyStarted);
        }

        let index_name = self
            .index_manager
            .create_timestamped_index(&self.alias_name, &self.mappings, &self.settings)
            .await?;

        info!(index = %index_name, "Created index for run");
        self.state = RunState::Active { index_name };
        Ok(())
    }

    /// Write one category and verify the engine's report of the writes.
    ///
    /// The display document is written on its own and the synonym documents
    /// as one bulk request, the category entry included. Rejected documents
    /// fail the category with `Indexing`; a synonym document that replaced an
    /// existing one means the category's source rows repeat and fails it with
    /// `DuplicateData`. Both conditions are evaluated before failing, and
    /// rejections take precedence.
    #[instrument(skip(self, matches), fields(match_count = matches.len()))]
    async fn load_record(&self, matches: &[BestBetMatch]) -> Result<(), LoaderError> {
        let index_name = self.active_index("load_record")?;
        let documents = build_category_documents(matches)?;
        let content_id = documents.content_id.as_str();

        let display = serde_json::to_value(&documents.display)?;
        let synonyms = documents
            .synonyms
            .iter()
            .map(|(id, doc)| Ok(BulkDocument::new(id.clone(), serde_json::to_value(doc)?)))
            .collect::<Result<Vec<BulkDocument>, serde_json::Error>>()?;

        // Disjoint IDs, so the two writes can go out together
        let (display_result, summary) = tokio::try_join!(
            self.index_manager
                .index_document(index_name, content_id, &display),
            self.index_manager.index_document_bulk(index_name, &synonyms),
        )?;

        if !display_result.is_created() {
            warn!(
                content_id = %content_id,
                result = %display_result.result,
                "Category display replaced an existing document"
            );
        }

        let had_errors = summary.has_errors();
        let had_duplicates = summary.has_updates();

        if had_errors {
            error!(
                content_id = %content_id,
                errors = ?summary.errors,
                "Category had document errors"
            );
        }
        if had_duplicates {
            error!(
                content_id = %content_id,
                updated = ?summary.updated,
                "Category appears to have duplicates"
            );
        }

        if had_errors {
            return Err(LoaderError::Indexing {
                content_id: content_id.to_string(),
            });
        }
        if had_duplicates {
            return Err(LoaderError::DuplicateData {
                content_id: content_id.to_string(),
            });
        }

        debug!(
            content_id = %content_id,
            synonyms = summary.created.len(),
            "Category loaded"
        );
        Ok(())
    }

    /// Optimize the run's index, point the alias at it, then prune old indices.
    ///
    /// Once the alias has moved the run counts as complete, so a failed
    /// cleanup is still reported but `abort` will not remove the live index.
    #[instrument(skip(self), fields(alias = %self.alias_name))]
    async fn end(&mut self) -> Result<(), LoaderError> {
        let index_name = self.active_index("end")?.to_string();

        self.index_manager.optimize_index(&index_name).await?;

        self.index_manager
            .set_alias_to_single_index(&self.alias_name, &index_name)
            .await?;
        self.state = RunState::Complete {
            index_name: index_name.clone(),
        };

        let deleted = self
            .index_manager
            .cleanup_old_indices(&self.alias_name, self.days_to_keep, self.min_indexes_to_keep)
            .await?;

        info!(
            index = %index_name,
            pruned = deleted.len(),
            "Published index"
        );
        Ok(())
    }

    /// Delete the index created by `begin` if the run is still active.
    #[instrument(skip(self), fields(alias = %self.alias_name))]
    async fn abort(&mut self) -> Result<(), LoaderError> {
        let RunState::Active { index_name } = &self.state else {
            debug!(state = ?self.state, "Nothing to clean up");
            return Ok(());
        };

        let index_name = index_name.clone();
        self.index_manager.delete_index(&index_name).await?;
        self.state = RunState::Aborted;

        warn!(index = %index_name, "Aborted run and removed its index");
        Ok(())
    }
}
