//! Dependency initialization and wiring for the best bets loader.

use tracing::{error, info};

use crate::config::LoadSettings;
use crate::AppError;
use bestbets_pipeline::{FileSystemBestBetsSource, LoaderConfig, Orchestrator};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from load settings.
    ///
    /// Every configuration problem of the selected loader is logged before
    /// the first one is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If a setting is invalid or a schema file cannot be loaded
    pub async fn new(settings: LoadSettings) -> Result<Self, AppError> {
        let problems = settings.loader.validate();
        for problem in &problems {
            error!(field = problem.field, error = %problem, "Invalid loader setting");
        }
        if let Some(problem) = problems.into_iter().next() {
            return Err(problem.into());
        }

        let source = FileSystemBestBetsSource::new(&settings.source)?;
        info!(content_path = %source.content_path().display(), "Source configured");

        let loader_kind = match &settings.loader {
            LoaderConfig::Elastic(_) => "elastic",
            LoaderConfig::File(_) => "file",
        };
        let orchestrator_config = settings.orchestrator_config();
        let loader = settings.loader.into_loader().await?;
        info!(loader = loader_kind, "Loader configured");

        let orchestrator =
            Orchestrator::with_config(Box::new(source), loader, orchestrator_config);

        Ok(Self { orchestrator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestbets_pipeline::{ElasticLoaderConfig, FileLoaderConfig, SourceConfig};
    use crate::config::LogFormat;

    fn settings(loader: LoaderConfig, content_path: &str) -> LoadSettings {
        LoadSettings {
            loader,
            source: SourceConfig {
                content_path: content_path.to_string(),
            },
            concurrency: 4,
            log_format: LogFormat::Text,
        }
    }

    #[tokio::test]
    async fn test_invalid_loader_settings_fail() {
        let result = Dependencies::new(settings(
            LoaderConfig::Elastic(ElasticLoaderConfig::default()),
            "/content",
        ))
        .await;

        match result {
            Err(err) => assert_eq!(
                err.to_string(),
                "Configuration error: eshosts is required for the elastic loader"
            ),
            Ok(_) => panic!("expected a configuration error"),
        }
    }

    #[tokio::test]
    async fn test_blank_content_path_fails() {
        let result = Dependencies::new(settings(
            LoaderConfig::File(FileLoaderConfig {
                output_file: Some("bestbets.ndjson".to_string()),
                index_name: Some("bestbets_v1".to_string()),
                ..Default::default()
            }),
            "  ",
        ))
        .await;

        match result {
            Err(err) => assert_eq!(
                err.to_string(),
                "Configuration error: You must supply a file system path."
            ),
            Ok(_) => panic!("expected a configuration error"),
        }
    }

    #[tokio::test]
    async fn test_file_loader_wires_up() {
        let result = Dependencies::new(settings(
            LoaderConfig::File(FileLoaderConfig {
                output_file: Some("bestbets.ndjson".to_string()),
                index_name: Some("bestbets_v1".to_string()),
                ..Default::default()
            }),
            "/content",
        ))
        .await;

        assert!(result.is_ok());
    }
}
