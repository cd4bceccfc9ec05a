//! Load settings read from the environment.

use bestbets_pipeline::config::DEFAULT_CONTENT_PATH;
use bestbets_pipeline::orchestrator::DEFAULT_LOAD_CONCURRENCY;
use bestbets_pipeline::{
    ElasticLoaderConfig, FileLoaderConfig, LoaderConfig, OrchestratorConfig, SourceConfig,
};

use crate::AppError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Everything one load needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSettings {
    pub loader: LoaderConfig,
    pub source: SourceConfig,
    pub concurrency: usize,
    pub log_format: LogFormat,
}

impl LoadSettings {
    /// Read the settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `LOADER`: `elastic` (default) or `file`
    /// - `ES_HOSTS`: Comma-separated search engine URLs
    /// - `ALIAS_NAME`, `MAPPING_PATH`, `SETTINGS_PATH`
    /// - `DAYS_TO_KEEP`, `MIN_INDEXES_TO_KEEP`, `SOCKET_LIMIT`
    /// - `OUTPUT_FILE`, `INDEX_NAME`, `CATEGORY_DISPLAY_DOCUMENT_TYPE`,
    ///   `SYNONYMS_DOCUMENT_TYPE`: flat-file loader settings
    /// - `CONTENT_PATH`: Category directory (default: /content)
    /// - `LOAD_CONCURRENCY`: Categories loaded at once (default: 8)
    /// - `LOG_FORMAT`: `json` for JSON logs, plain text otherwise
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let loader = match var("LOADER").as_deref().map(str::trim) {
            None | Some("elastic") => LoaderConfig::Elastic(ElasticLoaderConfig {
                eshosts: var("ES_HOSTS").map(|hosts| split_hosts(&hosts)),
                alias_name: var("ALIAS_NAME"),
                mapping_path: var("MAPPING_PATH"),
                settings_path: var("SETTINGS_PATH"),
                days_to_keep: number(&var, "DAYS_TO_KEEP", "daysToKeep")?,
                min_indexes_to_keep: number(&var, "MIN_INDEXES_TO_KEEP", "minIndexesToKeep")?,
                socket_limit: number(&var, "SOCKET_LIMIT", "socketLimit")?,
            }),
            Some("file") => LoaderConfig::File(FileLoaderConfig {
                output_file: var("OUTPUT_FILE"),
                index_name: var("INDEX_NAME"),
                alias_name: var("ALIAS_NAME"),
                category_display_document_type: var("CATEGORY_DISPLAY_DOCUMENT_TYPE"),
                synonyms_document_type: var("SYNONYMS_DOCUMENT_TYPE"),
            }),
            Some(other) => {
                return Err(AppError::config(format!(
                    "Unknown loader '{}', expected 'elastic' or 'file'",
                    other
                )))
            }
        };

        let source = SourceConfig {
            content_path: var("CONTENT_PATH").unwrap_or_else(|| DEFAULT_CONTENT_PATH.to_string()),
        };

        let concurrency = match var("LOAD_CONCURRENCY") {
            None => DEFAULT_LOAD_CONCURRENCY,
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::config("LOAD_CONCURRENCY must be a number greater than 0"))?,
        };

        let log_format = match var("LOG_FORMAT").map(|f| f.trim().to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            loader,
            source,
            concurrency,
            log_format,
        })
    }

    /// Orchestrator settings for this load.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            concurrency: self.concurrency,
        }
    }
}

fn split_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}

fn number<F>(var: &F, key: &str, field: &'static str) -> Result<Option<i64>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| ElasticLoaderConfig::parse_number(field, &raw))
        .transpose()
        .map_err(AppError::from)
}
