use anyhow::{Context, Result};
use clap::Parser;
use resume_feedback::cli::{handle_command, Cli};
use resume_feedback::ConfigManager;
use std::fs::OpenOptions;
use std::process::ExitCode;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = ConfigManager::load(cli.config.as_deref())?.with_endpoint(cli.endpoint.clone());

    // Terminal output is the form itself; logs go to a file
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.logging.log_file)
        .with_context(|| {
            format!(
                "Failed to open log file: {}",
                config.logging.log_file.display()
            )
        })?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Analysis endpoint: {}", config.service.endpoint_url);
    match config.service.timeout_seconds {
        Some(secs) => info!("Request timeout: {}s", secs),
        None => info!("Request timeout: transport default"),
    }

    handle_command(cli.command, &config).await
}
