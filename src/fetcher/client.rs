//! HTTP client construction
//!
//! One `reqwest::Client` is built per run and injected into every fetcher.
//! The client pools connections internally and is safe to share across tasks.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::fetcher::{FetcherError, FetcherResult};

/// HTTP connect timeout (seconds) - time to establish TCP connection
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Build the shared HTTP client with an overall per-request timeout
pub fn build_http_client(request_timeout: Duration) -> FetcherResult<Arc<Client>> {
    let connect_timeout = Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS).min(request_timeout);
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .build()
        .map(Arc::new)
        .map_err(|e| FetcherError::ClientError(format!("Failed to build HTTP client: {e}")))
}
