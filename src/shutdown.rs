//! Cancellation signal for the collection loop.
//!
//! A [`CancellationSignal`] is armed at startup, fires at most once, and is
//! never reset. It is handed explicitly to whoever needs to observe it; the
//! interrupt handler installed by [`spawn_interrupt_listener`] is the only
//! producer in the binary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Shared handle to a cancellation signal.
pub type SharedCancellation = Arc<CancellationSignal>;

/// One-shot cancellation flag with async notification.
#[derive(Debug, Default)]
pub struct CancellationSignal {
    fired: AtomicBool,
    notify: Notify,
}

impl CancellationSignal {
    /// Create an armed signal.
    pub fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Create an armed signal wrapped in [`Arc`].
    pub fn shared() -> SharedCancellation {
        Arc::new(Self::new())
    }

    /// Fire the signal. Returns `true` only for the call that fired it.
    pub fn cancel(&self) -> bool {
        let first = !self.fired.swap(true, Ordering::SeqCst);
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    /// Whether the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Resolve once the signal has fired. Returns immediately if it already has.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent cancel() is not missed.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Fire `signal` on the first Ctrl+C received by the process.
pub fn spawn_interrupt_listener(signal: SharedCancellation) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received - stopping collection and keeping partial results");
                signal.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for interrupt signal"),
        }
    })
}
