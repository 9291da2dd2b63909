//! Collection configuration constants

/// Default number of day requests allowed in flight at once.
/// Small ranges (a month or less) still run fully in parallel.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Upper bound accepted for `max_concurrency` on the command line
pub const MAX_CONCURRENCY_LIMIT: usize = 256;

/// Default per-request timeout in seconds.
/// A hung request becomes a transient failure instead of stalling the run.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Capacity of the result channel between workers and the collection loop.
/// Workers wait for the collector instead of buffering outcomes.
pub const RESULT_CHANNEL_CAPACITY: usize = 1;
