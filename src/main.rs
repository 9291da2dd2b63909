//! Main entry point for vehicle-mileage-downloader CLI

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vehicle_mileage_downloader::cli::run::FATAL_EXIT_CODE;
use vehicle_mileage_downloader::cli::{Cli, RunOutcome};
use vehicle_mileage_downloader::shutdown::{self, CancellationSignal};

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    // Check if JSON output is requested via environment variable
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vehicle_mileage_downloader=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Armed before any work starts; fires on the first Ctrl+C
    let cancellation = CancellationSignal::shared();
    shutdown::spawn_interrupt_listener(cancellation.clone());

    let code = match cli.execute(cancellation).await {
        Ok(outcome) => {
            match &outcome {
                RunOutcome::Saved { rows, path, status } => {
                    info!(rows = rows, status = ?status, "Saved {}", path.display());
                }
                RunOutcome::NoData { .. } => println!("No data to save"),
                RunOutcome::DryRun { windows } => info!(windows = windows, "Dry run complete"),
            }
            outcome.exit_code()
        }
        Err(e) => {
            error!("Run failed: {:#}", anyhow::Error::new(e));
            FATAL_EXIT_CODE
        }
    };

    std::process::exit(code);
}
