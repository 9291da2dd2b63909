//! Mileage download command

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::downloader::config::MAX_CONCURRENCY_LIMIT;
use crate::downloader::{CollectionStatus, MileageCollector};
use crate::fetcher::client::build_http_client;
use crate::fetcher::telemetry_http::TelemetryHttpClient;
use crate::fetcher::MileageSource;
use crate::output::sink_for_path;
use crate::partition::partition;
use crate::shutdown::SharedCancellation;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::CliError;

/// Parse and validate concurrency value
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    if value > MAX_CONCURRENCY_LIMIT {
        return Err(format!(
            "concurrency {value} exceeds maximum of {MAX_CONCURRENCY_LIMIT}"
        ));
    }
    Ok(value)
}

/// Vehicle Mileage Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "vehicle-mileage-downloader")]
#[command(about = "Download daily vehicle mileage from the telemetry API into a sheet", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override `file_to_save` from the configuration
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Maximum number of requests in flight (overrides the configuration)
    #[arg(long, value_parser = parse_concurrency)]
    pub max_concurrency: Option<usize>,

    /// Log the planned day windows and exit without contacting the API
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// How a run ended, when it did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The sheet was written
    Saved {
        /// Rows in the sheet
        rows: u64,
        /// Sheet location
        path: PathBuf,
        /// Whether collection ran to completion or was cancelled
        status: CollectionStatus,
    },
    /// Nothing was collected, no file was written
    NoData {
        /// Whether collection ran to completion or was cancelled
        status: CollectionStatus,
    },
    /// Dry run: windows were planned but not fetched
    DryRun {
        /// Number of windows that would be fetched
        windows: usize,
    },
}

impl RunOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Saved { .. } | RunOutcome::DryRun { .. } => 0,
            RunOutcome::NoData { .. } => 1,
        }
    }
}

/// Exit code for any [`CliError`]
pub const FATAL_EXIT_CODE: i32 = 2;

impl Cli {
    /// Load the configuration and apply command line overrides
    pub fn load_config(&self) -> Result<AppConfig, CliError> {
        let mut config = AppConfig::load(&self.config)?;
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(max_concurrency) = self.max_concurrency {
            config.max_concurrency = max_concurrency;
        }
        Ok(config)
    }

    /// Execute the command
    pub async fn execute(&self, cancellation: SharedCancellation) -> Result<RunOutcome, CliError> {
        let config = self.load_config()?;

        if self.dry_run {
            return plan_only(&config);
        }

        let client = build_http_client(config.request_timeout)?;
        let source =
            TelemetryHttpClient::new(client, config.base_url.clone(), config.api_token.clone());

        run_pipeline(&config, Arc::new(source), cancellation, !self.no_progress).await
    }
}

fn plan_only(config: &AppConfig) -> Result<RunOutcome, CliError> {
    let windows = partition(config.date_from, config.date_to, config.timezone)?;
    for window in &windows {
        info!(date = %window.date(), window = %window, "Planned window");
    }
    info!(windows = windows.len(), "Dry run - no requests sent");
    Ok(RunOutcome::DryRun {
        windows: windows.len(),
    })
}

/// Partition, collect and export using an already built source.
///
/// The sheet is only written when at least one day was collected.
pub async fn run_pipeline(
    config: &AppConfig,
    source: Arc<dyn MileageSource>,
    cancellation: SharedCancellation,
    show_progress: bool,
) -> Result<RunOutcome, CliError> {
    let windows = partition(config.date_from, config.date_to, config.timezone)?;
    info!(
        from = %config.date_from,
        to = %config.date_to,
        timezone = %config.timezone,
        windows = windows.len(),
        "Date range partitioned"
    );

    let mut collector =
        MileageCollector::new(source, cancellation).with_max_concurrency(config.max_concurrency);
    if show_progress {
        collector = collector.with_progress_bar(create_progress_bar(windows.len() as u64));
    }

    let report = collector.collect(windows).await?;

    if !report.has_data() {
        warn!(status = ?report.status, "No data to save");
        return Ok(RunOutcome::NoData {
            status: report.status,
        });
    }

    if let Some((first, last)) = report.aggregate.date_span() {
        info!(first = %first, last = %last, days = report.aggregate.len(), "Exporting sheet");
    }

    let mut sink = sink_for_path(&config.output_path);
    let rows = sink.export(&report.aggregate)?;

    Ok(RunOutcome::Saved {
        rows,
        path: config.output_path.clone(),
        status: report.status,
    })
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("fetching days");
    pb
}
