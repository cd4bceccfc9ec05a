//! OpenSearch index manager implementation.
//!
//! This module provides the concrete implementation of `IndexManager`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use chrono::Utc;
use opensearch::{
    http::request::JsonBody,
    http::response::Response,
    http::transport::{
        MultiNodeConnectionPool, SingleNodeConnectionPool, Transport, TransportBuilder,
    },
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesForcemergeParts, IndicesGetAliasParts,
        IndicesGetParts,
    },
    BulkParts, IndexParts, OpenSearch,
};
use serde_json::Value;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::IndexManagerConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::IndexManager;
use crate::opensearch::requests::{
    build_alias_actions, build_bulk_body, build_create_index_body, index_pattern,
    timestamped_index_name,
};
use crate::opensearch::responses::{parse_alias_holders, parse_bulk_response, parse_index_listing};
use crate::retention::select_indices_to_delete;
use crate::types::{BulkDocument, BulkIndexSummary, IndexResult};

/// OpenSearch index manager.
///
/// Creates timestamped indices, writes best bet documents, and rotates the
/// published alias using OpenSearch as the backend.
///
/// # Example
///
/// ```ignore
/// use bestbets_repository::{IndexManagerConfig, OpenSearchIndexManager};
/// let config = IndexManagerConfig::new(vec!["http://localhost:9200".to_string()]);
/// let manager = OpenSearchIndexManager::new(config).await?;
///
/// let index_name = manager
///     .create_timestamped_index("bestbets_v1", &mappings, &settings)
///     .await?;
/// ```
pub struct OpenSearchIndexManager {
    client: OpenSearch,
    sockets: Option<Semaphore>,
}

impl OpenSearchIndexManager {
    /// Create a new index manager connected to the configured hosts.
    ///
    /// # Arguments
    ///
    /// * `config` - Node URLs and the optional socket limit
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchIndexManager)` - A new manager instance
    /// * `Err(SearchIndexError)` - If a URL is invalid or transport setup fails
    pub async fn new(config: IndexManagerConfig) -> Result<Self, SearchIndexError> {
        let urls = config
            .hosts
            .iter()
            .map(|host| Url::parse(host).map_err(|e| SearchIndexError::connection(e.to_string())))
            .collect::<Result<Vec<Url>, SearchIndexError>>()?;

        let transport = Self::build_transport(urls)?;
        let client = OpenSearch::new(transport);

        info!(
            hosts = ?config.hosts,
            socket_limit = ?config.socket_limit,
            "Created OpenSearch index manager"
        );

        Ok(Self {
            client,
            sockets: config.socket_limit.map(Semaphore::new),
        })
    }

    fn build_transport(mut urls: Vec<Url>) -> Result<Transport, SearchIndexError> {
        let transport = match urls.len() {
            0 => return Err(SearchIndexError::connection("No OpenSearch hosts configured")),
            1 => {
                let conn_pool = SingleNodeConnectionPool::new(urls.remove(0));
                TransportBuilder::new(conn_pool).disable_proxy().build()
            }
            _ => {
                let conn_pool = MultiNodeConnectionPool::round_robin(urls, None);
                TransportBuilder::new(conn_pool).disable_proxy().build()
            }
        };

        transport.map_err(|e| SearchIndexError::connection(e.to_string()))
    }

    /// Wait for a free socket when a socket limit is configured.
    async fn acquire_socket(&self) -> Result<Option<SemaphorePermit<'_>>, SearchIndexError> {
        match &self.sockets {
            Some(sockets) => sockets
                .acquire()
                .await
                .map(Some)
                .map_err(|e| SearchIndexError::connection(e.to_string())),
            None => Ok(None),
        }
    }

    /// Turn a non-success status into an error carrying the response body.
    async fn ensure_success(
        response: Response,
        operation: &str,
        to_error: fn(String) -> SearchIndexError,
    ) -> Result<Response, SearchIndexError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, "{} request failed", operation);
        Err(to_error(format!(
            "{} failed with status {}: {}",
            operation, status, error_body
        )))
    }

    async fn read_json(
        response: Response,
        to_error: fn(String) -> SearchIndexError,
    ) -> Result<Value, SearchIndexError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| to_error(e.to_string()))
    }

    /// Names of the indices the alias currently points at.
    async fn alias_holders(&self, alias_name: &str) -> Result<Vec<String>, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Name(&[alias_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::alias(e.to_string()))?;

        // 404 means nothing holds the alias yet
        if response.status_code().as_u16() == 404 {
            return Ok(Vec::new());
        }

        let response =
            Self::ensure_success(response, "Get alias", SearchIndexError::AliasError).await?;
        let body = Self::read_json(response, SearchIndexError::ParseError).await?;
        Ok(parse_alias_holders(&body))
    }
}

#[async_trait]
impl IndexManager for OpenSearchIndexManager {
    #[instrument(skip(self, mappings, settings))]
    async fn create_timestamped_index(
        &self,
        alias_name: &str,
        mappings: &Value,
        settings: &Value,
    ) -> Result<String, SearchIndexError> {
        let index_name = timestamped_index_name(alias_name, Utc::now());
        let body = build_create_index_body(mappings, settings);

        let _socket = self.acquire_socket().await?;
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index_name))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        Self::ensure_success(
            response,
            "Create index",
            SearchIndexError::IndexCreationError,
        )
        .await?;

        info!(index = %index_name, "Created index");
        Ok(index_name)
    }

    async fn index_document(
        &self,
        index_name: &str,
        id: &str,
        document: &Value,
    ) -> Result<IndexResult, SearchIndexError> {
        let _socket = self.acquire_socket().await?;
        let response = self
            .client
            .index(IndexParts::IndexId(index_name, id))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let response =
            Self::ensure_success(response, "Index document", SearchIndexError::IndexError).await?;
        let body = Self::read_json(response, SearchIndexError::ParseError).await?;

        let result = body
            .get("result")
            .and_then(Value::as_str)
            .ok_or_else(|| SearchIndexError::parse("Index response has no result"))?
            .to_string();

        debug!(doc_id = %id, result = %result, "Document indexed");
        Ok(IndexResult { result })
    }

    async fn index_document_bulk(
        &self,
        index_name: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkIndexSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BulkIndexSummary::default());
        }

        let body: Vec<JsonBody<Value>> = build_bulk_body(index_name, documents)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let _socket = self.acquire_socket().await?;
        let response = self
            .client
            .bulk(BulkParts::Index(index_name))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_operation(e.to_string()))?;

        let response = Self::ensure_success(
            response,
            "Bulk index",
            SearchIndexError::BulkOperationError,
        )
        .await?;
        let body = Self::read_json(response, SearchIndexError::ParseError).await?;
        let summary = parse_bulk_response(&body)?;

        debug!(
            created = summary.created.len(),
            updated = summary.updated.len(),
            errors = summary.errors.len(),
            "Bulk index completed"
        );
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn optimize_index(&self, index_name: &str) -> Result<(), SearchIndexError> {
        let _socket = self.acquire_socket().await?;
        let response = self
            .client
            .indices()
            .forcemerge(IndicesForcemergeParts::Index(&[index_name]))
            .max_num_segments(1)
            .send()
            .await
            .map_err(|e| SearchIndexError::optimize(e.to_string()))?;

        Self::ensure_success(response, "Force merge", SearchIndexError::OptimizeError).await?;

        info!(index = %index_name, "Optimized index");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_alias_to_single_index(
        &self,
        alias_name: &str,
        index_name: &str,
    ) -> Result<(), SearchIndexError> {
        let _socket = self.acquire_socket().await?;
        let current = self.alias_holders(alias_name).await?;
        let actions = build_alias_actions(alias_name, &current, index_name);

        let response = self
            .client
            .indices()
            .update_aliases()
            .body(actions)
            .send()
            .await
            .map_err(|e| SearchIndexError::alias(e.to_string()))?;

        Self::ensure_success(response, "Update aliases", SearchIndexError::AliasError).await?;

        info!(
            alias = %alias_name,
            index = %index_name,
            detached = ?current,
            "Alias now points at a single index"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_old_indices(
        &self,
        alias_name: &str,
        days_to_keep: u32,
        min_indexes_to_keep: u32,
    ) -> Result<Vec<String>, SearchIndexError> {
        let pattern = index_pattern(alias_name);

        let listing = {
            let _socket = self.acquire_socket().await?;
            let response = self
                .client
                .indices()
                .get(IndicesGetParts::Index(&[pattern.as_str()]))
                .send()
                .await
                .map_err(|e| SearchIndexError::cleanup(e.to_string()))?;

            if response.status_code().as_u16() == 404 {
                Value::Object(Default::default())
            } else {
                let response =
                    Self::ensure_success(response, "List indices", SearchIndexError::CleanupError)
                        .await?;
                Self::read_json(response, SearchIndexError::ParseError).await?
            }
        };

        let indices = parse_index_listing(&listing, alias_name)?;
        let doomed = select_indices_to_delete(&indices, Utc::now(), days_to_keep, min_indexes_to_keep);

        for index_name in &doomed {
            self.delete_index(index_name).await?;
        }

        info!(
            alias = %alias_name,
            candidates = indices.len(),
            deleted = doomed.len(),
            "Cleaned up old indices"
        );
        Ok(doomed)
    }

    async fn delete_index(&self, index_name: &str) -> Result<(), SearchIndexError> {
        let _socket = self.acquire_socket().await?;
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        // 404 is acceptable - index may not exist
        if response.status_code().as_u16() == 404 {
            warn!(index = %index_name, "Index to delete does not exist");
            return Ok(());
        }

        Self::ensure_success(response, "Delete index", SearchIndexError::DeleteError).await?;

        debug!(index = %index_name, "Index deleted");
        Ok(())
    }
}
