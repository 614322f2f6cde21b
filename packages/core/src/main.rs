use clap::Parser;
use dotenvy::dotenv;

use follower_sync::cli::Cli;
use follower_sync::config::Config;
use follower_sync::error::AppError;
use follower_sync::logging::{init_logging, DEFAULT_LOG_DIRECTIVE};
use follower_sync::sync::SyncRunner;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging(DEFAULT_LOG_DIRECTIVE);

    let cli = Cli::parse();

    let config = Config::from_env()
        .and_then(|config| config.with_overrides(&cli))
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        });

    tracing::info!("Follower sync starting with config: {:?}", config);

    let outcome = match SyncRunner::from_config(&config) {
        Ok(runner) => runner.run().await,
        Err(err) => Err(err),
    };

    // Per-account failures are already contained in the report; only a
    // run-level error changes the exit status.
    match outcome {
        Ok(report) => {
            tracing::info!(
                accounts = report.summary.total(),
                skipped = report.skipped,
                persistence_failures = report.persistence_failures,
                notified = report.notified,
                "Sync complete"
            );
        }
        Err(err) => {
            tracing::error!("{}", err);
            std::process::exit(1);
        }
    }
}
