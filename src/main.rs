// Main entry point - CLI parsing, dependency injection and exit codes
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use crate::application::sanitizer::Sanitizer;
use crate::application::sync_service::{SyncOptions, SyncService};
use crate::infrastructure::config::{load_sync_config, CliOverrides};
use crate::infrastructure::grafana_repository::GrafanaRepository;
use crate::presentation::report::ConsoleReporter;

/// Exit code when the run finished but some dashboards were skipped
const EXIT_PARTIAL: u8 = 2;

/// Sync Grafana dashboards to a local directory for version control
#[derive(Parser, Debug)]
#[command(name = "grafana-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grafana service account token
    #[arg(long, env = "GRAFANA_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Grafana URL [default: http://localhost:3000]
    #[arg(long, env = "GRAFANA_URL")]
    url: Option<String>,

    /// Output directory for JSON files [default: ./grafana_provisioning/dashboards]
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Write changes to disk (default is a dry run)
    #[arg(long)]
    sync: bool,

    /// Show line-by-line JSON diffs
    #[arg(long)]
    diff: bool,

    /// Store dashboards in one sub-directory per Grafana folder
    #[arg(long)]
    folders: bool,

    /// Keep the remote JSON as-is instead of stripping server noise
    #[arg(long)]
    raw: bool,

    /// Configuration file [default: config/grafana-sync.*, optional]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".red(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let key = cli
        .key
        .filter(|k| !k.trim().is_empty())
        .context("Missing API key. Provide --key or set GRAFANA_API_KEY environment variable.")?;

    let config = load_sync_config(cli.config.as_deref())
        .context("Failed to load configuration")?
        .apply_overrides(CliOverrides {
            url: cli.url,
            dir: cli.dir,
            folders: cli.folders,
            raw: cli.raw,
        })?;
    tracing::debug!("Effective configuration: {:?}", config);

    let repository = GrafanaRepository::new(
        config.url.clone(),
        key,
        config.page_size,
        Duration::from_secs(config.timeout_secs),
    )
    .context("Failed to build HTTP client")?;

    println!("Connecting to {}...", repository.host());

    let service = SyncService::new(
        Arc::new(repository),
        Sanitizer::new(config.sanitize.clone()),
        config.dir.clone(),
        SyncOptions {
            sync: cli.sync,
            diff: cli.diff,
            folders: config.folders,
            diff_context: config.diff_context,
        },
    );

    let mut reporter = ConsoleReporter;
    let report = service
        .run(&mut reporter)
        .await
        .with_context(|| format!("Failed to list dashboards from {}", config.url))?;

    if report.has_failures() {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
