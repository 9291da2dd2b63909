//! Concurrent dispatch of day windows and the collection loop

use crate::downloader::config::{DEFAULT_MAX_CONCURRENCY, RESULT_CHANNEL_CAPACITY};
use crate::downloader::{
    Aggregate, CollectionProgress, CollectionReport, CollectionStatus, DownloadError,
};
use crate::fetcher::{fetch_day, FetchOutcome, MileageSource};
use crate::shutdown::SharedCancellation;
use crate::window::DayWindow;
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn, Instrument};

/// Fetches every window concurrently and folds the outcomes into an [`Aggregate`]
pub struct MileageCollector {
    source: Arc<dyn MileageSource>,
    cancellation: SharedCancellation,
    max_concurrency: usize,
    progress_bar: Option<ProgressBar>,
}

impl MileageCollector {
    /// Create a collector over `source`, stopping early when `cancellation` fires
    pub fn new(source: Arc<dyn MileageSource>, cancellation: SharedCancellation) -> Self {
        Self {
            source,
            cancellation,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            progress_bar: None,
        }
    }

    /// Limit the number of requests in flight (at least 1)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Report collected days on a progress bar
    pub fn with_progress_bar(mut self, bar: ProgressBar) -> Self {
        self.progress_bar = Some(bar);
        self
    }

    /// Run one fetch per window and collect until every window reported back
    /// or cancellation fires.
    ///
    /// Transient failures only reduce the number of collected days. A fatal
    /// outcome aborts the remaining workers and returns an error without a
    /// report. On cancellation the remaining workers are aborted and their
    /// results discarded; the report holds what was collected so far.
    pub async fn collect(
        &self,
        windows: Vec<DayWindow>,
    ) -> Result<CollectionReport, DownloadError> {
        let span = tracing::info_span!(
            "collect",
            windows = windows.len(),
            first = ?windows.first().map(|w| w.date()),
            last = ?windows.last().map(|w| w.date()),
            max_concurrency = self.max_concurrency,
            source = %self.source.base_url(),
        );
        self.collect_inner(windows).instrument(span).await
    }

    async fn collect_inner(
        &self,
        windows: Vec<DayWindow>,
    ) -> Result<CollectionReport, DownloadError> {
        let mut progress = CollectionProgress {
            dispatched: windows.len() as u64,
            ..Default::default()
        };
        info!(dispatched = progress.dispatched, "Starting mileage collection");

        if let Some(bar) = &self.progress_bar {
            bar.set_length(progress.dispatched);
        }

        let (tx, mut rx) = mpsc::channel::<FetchOutcome>(RESULT_CHANNEL_CAPACITY);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut workers = JoinSet::new();

        for window in windows {
            let tx = tx.clone();
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            workers.spawn(
                async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return;
                    };
                    let outcome = fetch_day(source.as_ref(), window).await;
                    // A closed channel means collection already stopped.
                    let _ = tx.send(outcome).await;
                }
                .in_current_span(),
            );
        }
        drop(tx);

        let mut aggregate = Aggregate::new();
        let status = loop {
            if progress.pending() == 0 {
                break CollectionStatus::Completed;
            }

            tokio::select! {
                biased;

                _ = self.cancellation.cancelled() => {
                    info!(
                        collected = progress.succeeded,
                        abandoned = progress.pending(),
                        "Cancellation requested - stopping collection"
                    );
                    break CollectionStatus::Cancelled;
                }

                outcome = rx.recv() => match outcome {
                    Some(FetchOutcome::Success(measurement)) => {
                        progress.succeeded += 1;
                        if aggregate.insert(measurement).is_some() {
                            warn!(
                                date = %measurement.date,
                                "Duplicate date received, keeping latest value"
                            );
                        }
                    }
                    Some(FetchOutcome::TransientFailure { .. }) => {
                        progress.failed += 1;
                    }
                    Some(FetchOutcome::FatalFailure { date, reason }) => {
                        workers.abort_all();
                        if let Some(bar) = &self.progress_bar {
                            bar.abandon();
                        }
                        return Err(DownloadError::MalformedResponse { date, reason });
                    }
                    None => {
                        warn!(missing = progress.pending(), "All workers exited before reporting");
                        break CollectionStatus::Completed;
                    }
                },
            }

            if let Some(bar) = &self.progress_bar {
                bar.set_position(progress.received());
                bar.set_message(format!("{} days collected", progress.succeeded));
            }
            debug!(
                received = progress.received(),
                dispatched = progress.dispatched,
                "Collection progress: {:.1}%",
                progress.percentage()
            );
        };

        // Stragglers are not joined; aborting drops their in-flight requests.
        workers.abort_all();

        if let Some(bar) = &self.progress_bar {
            match status {
                CollectionStatus::Completed => bar.finish_and_clear(),
                CollectionStatus::Cancelled => bar.abandon(),
            }
        }

        info!(
            status = ?status,
            succeeded = progress.succeeded,
            failed = progress.failed,
            days = aggregate.len(),
            "Mileage collection finished"
        );

        Ok(CollectionReport {
            aggregate,
            status,
            progress,
        })
    }
}
