//! # Vehicle Mileage Downloader Library
//!
//! Downloads daily odometer readings for a vehicle from a telemetry API and
//! consolidates them into a date-sorted sheet.
//!
//! ## Features
//!
//! - **Per-day fetching**: a date range is split into calendar-day windows,
//!   one request per window
//! - **Bounded concurrency**: windows are fetched in parallel behind a semaphore
//! - **Graceful cancellation**: Ctrl+C stops collection and keeps the partial result
//! - **Deterministic output**: rows are written in ascending date order
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use vehicle_mileage_downloader::downloader::MileageCollector;
//! use vehicle_mileage_downloader::fetcher::client::build_http_client;
//! use vehicle_mileage_downloader::fetcher::telemetry_http::TelemetryHttpClient;
//! use vehicle_mileage_downloader::partition::{partition, resolve_timezone};
//! use vehicle_mileage_downloader::shutdown::CancellationSignal;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tz = resolve_timezone("Europe/Moscow")?;
//! let windows = partition(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
//!     tz,
//! )?;
//!
//! let client = build_http_client(std::time::Duration::from_secs(30))?;
//! let source = TelemetryHttpClient::new(client, "http://api.car-online.ru/v2", "token");
//! let collector = MileageCollector::new(Arc::new(source), CancellationSignal::shared());
//! let report = collector.collect(windows).await?;
//! println!("collected {} days", report.aggregate.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`window`] - Immutable timestamps and calendar-day windows
//! - [`partition`] - Splitting a date range into day windows
//! - [`fetcher`] - Telemetry sources and the per-day fetch worker
//! - [`downloader`] - Concurrent dispatch and the collection loop
//! - [`output`] - Export sinks (xlsx workbook, CSV sheet)
//! - [`config`] - YAML configuration loading and validation
//! - [`shutdown`] - Cancellation signal shared with the collection loop

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// CLI command implementations
pub mod cli;

/// Configuration file loading
pub mod config;

/// Concurrent collection of daily measurements
pub mod downloader;

/// Telemetry fetchers
pub mod fetcher;

/// Export sinks
pub mod output;

/// Date range partitioning
pub mod partition;

/// Cancellation signal shared across tasks
pub mod shutdown;

/// Timestamps and day windows
pub mod window;

pub use config::AppConfig;
pub use window::{DayWindow, Timestamp};

/// The telemetry API reports distance in meters.
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// One day's odometer reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    /// Calendar day the reading belongs to
    pub date: NaiveDate,
    /// Mileage in kilometers
    pub mileage_km: f64,
}

impl Measurement {
    /// Build a measurement from a raw reading in meters
    pub fn from_meters(date: NaiveDate, meters: f64) -> Self {
        Self {
            date,
            mileage_km: meters / METERS_PER_KILOMETER,
        }
    }
}
