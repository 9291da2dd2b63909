//! Telemetry fetchers and the per-day fetch worker

use crate::window::DayWindow;
use crate::Measurement;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{error, info, warn};

pub mod client;
pub mod telemetry_http;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// The request did not complete (connect, timeout, body read)
    #[error("network error: {0}")]
    NetworkError(String),

    /// The server answered with a non-success status
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The body could not be decoded into the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The HTTP client could not be built
    #[error("client error: {0}")]
    ClientError(String),
}

impl FetcherError {
    /// Whether this failure should stop the whole run.
    ///
    /// Only a completed request with an undecodable body is fatal; everything
    /// else drops that day's data point.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetcherError::MalformedResponse(_))
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Result of fetching one day window
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The day's reading
    Success(Measurement),
    /// The request failed; the day is missing from the output
    TransientFailure {
        /// Day that has no data
        date: NaiveDate,
        /// Error description
        reason: String,
    },
    /// The response could not be understood; the run must stop
    FatalFailure {
        /// Day whose response was malformed
        date: NaiveDate,
        /// Error description
        reason: String,
    },
}

impl FetchOutcome {
    /// Classify a fetch result for `window`
    pub fn from_result(window: &DayWindow, result: FetcherResult<Measurement>) -> Self {
        match result {
            Ok(measurement) => FetchOutcome::Success(measurement),
            Err(e) if e.is_fatal() => FetchOutcome::FatalFailure {
                date: window.date(),
                reason: e.to_string(),
            },
            Err(e) => FetchOutcome::TransientFailure {
                date: window.date(),
                reason: e.to_string(),
            },
        }
    }

    /// Day this outcome refers to
    pub fn date(&self) -> NaiveDate {
        match self {
            FetchOutcome::Success(m) => m.date,
            FetchOutcome::TransientFailure { date, .. }
            | FetchOutcome::FatalFailure { date, .. } => *date,
        }
    }
}

/// Source of daily mileage readings
///
/// Implementations must be safe to call from many tasks at once.
#[async_trait]
pub trait MileageSource: Send + Sync {
    /// Fetch the reading for one window
    ///
    /// # Arguments
    /// * `window` - Day window to query
    ///
    /// # Returns
    /// Measurement dated `window.date()`, mileage in kilometers
    async fn fetch_mileage(&self, window: &DayWindow) -> FetcherResult<Measurement>;

    /// Endpoint the source talks to
    fn base_url(&self) -> &str;
}

/// Fetch worker: run one window against `source` and log the outcome
pub async fn fetch_day(source: &dyn MileageSource, window: DayWindow) -> FetchOutcome {
    let outcome = FetchOutcome::from_result(&window, source.fetch_mileage(&window).await);
    match &outcome {
        FetchOutcome::Success(m) => {
            info!(date = %m.date, mileage_km = m.mileage_km, "Day fetched");
        }
        FetchOutcome::TransientFailure { date, reason } => {
            warn!(date = %date, error = %reason, "Day fetch failed, skipping");
        }
        FetchOutcome::FatalFailure { date, reason } => {
            error!(date = %date, error = %reason, "Malformed telemetry response");
        }
    }
    outcome
}
