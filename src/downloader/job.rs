//! Collection status and reporting

use crate::downloader::Aggregate;
use serde::{Deserialize, Serialize};

/// How the collection loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionStatus {
    /// Every dispatched window reported back
    Completed,
    /// The cancellation signal fired first
    Cancelled,
}

/// Counters describing a collection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionProgress {
    /// Windows handed to workers
    pub dispatched: u64,
    /// Windows that produced a measurement
    pub succeeded: u64,
    /// Windows that failed transiently
    pub failed: u64,
}

impl CollectionProgress {
    /// Outcomes received so far
    pub fn received(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Windows still outstanding
    pub fn pending(&self) -> u64 {
        self.dispatched.saturating_sub(self.received())
    }

    /// Completion percentage (0.0 to 100.0)
    pub fn percentage(&self) -> f64 {
        if self.dispatched == 0 {
            100.0
        } else {
            (self.received() as f64 / self.dispatched as f64) * 100.0
        }
    }
}

/// Final result of a collection run
#[derive(Debug, Clone)]
pub struct CollectionReport {
    /// Measurements collected, complete or partial
    pub aggregate: Aggregate,
    /// Why the loop stopped
    pub status: CollectionStatus,
    /// Counters at the moment the loop stopped
    pub progress: CollectionProgress,
}

impl CollectionReport {
    /// Whether there is anything to export
    pub fn has_data(&self) -> bool {
        !self.aggregate.is_empty()
    }
}
