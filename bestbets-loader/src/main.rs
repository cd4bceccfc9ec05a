use bestbets_loader::config::LogFormat;
use bestbets_loader::{AppError, Dependencies, LoadSettings};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Install the log subscriber. `RUST_LOG` overrides the default `info` level.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

async fn run(settings: LoadSettings) -> Result<(), AppError> {
    let mut dependencies = Dependencies::new(settings).await?;

    let summary = dependencies
        .orchestrator
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!(categories_loaded = summary.categories_loaded, "Done");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let settings = match LoadSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(LogFormat::Text);
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    init_logging(settings.log_format);

    if let Err(e) = run(settings).await {
        error!(error = %e, "Best bets load failed");
        std::process::exit(1);
    }
}
