//! Concurrent collection of daily measurements
//!
//! The collector turns a list of [`DayWindow`](crate::window::DayWindow)s into
//! an ordered [`Aggregate`]:
//!
//! 1. **Dispatch**: one task per window via [`executor::MileageCollector`],
//!    gated by a semaphore
//! 2. **Collection**: a single loop drains the result channel and is the sole
//!    writer of the aggregate
//! 3. **Cancellation**: the loop races the channel against the
//!    [`CancellationSignal`](crate::shutdown::CancellationSignal)
//!
//! # Error Handling
//!
//! Per-day failures are classified by the fetch worker:
//! - Transport and HTTP status errors drop that day and the run continues
//! - A malformed response body ends the run with [`DownloadError`]
//!
//! Cancellation is not an error: it yields a [`CollectionReport`] with
//! [`CollectionStatus::Cancelled`] and whatever was collected.

use chrono::NaiveDate;

pub mod aggregate;
pub mod config;
pub mod executor;
pub mod job;

pub use aggregate::Aggregate;
pub use executor::MileageCollector;
pub use job::{CollectionProgress, CollectionReport, CollectionStatus};

/// Collection errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A completed request returned an undecodable body
    #[error("malformed response for {date}: {reason}")]
    MalformedResponse {
        /// Day whose response was malformed
        date: NaiveDate,
        /// Decoder message
        reason: String,
    },
}
