//! Telemetry API client
//!
//! Issues `GET <base-url>?skey=..&content=json&begin=..&end=..&get=telemetry`
//! and reads the `mileage` field (meters) from the JSON body.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::fetcher::{FetcherError, FetcherResult, MileageSource};
use crate::window::DayWindow;
use crate::Measurement;

/// Subset of the telemetry response this crate consumes
#[derive(Debug, Deserialize)]
struct TelemetryResponse {
    mileage: f64,
}

/// HTTP implementation of [`MileageSource`]
pub struct TelemetryHttpClient {
    client: Arc<Client>,
    base_url: String,
    api_token: String,
}

impl TelemetryHttpClient {
    /// Create new telemetry client
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `base_url` - Telemetry endpoint (e.g., "<http://api.car-online.ru/v2>")
    /// * `api_token` - Static token sent as `skey`
    pub fn new(
        client: Arc<Client>,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    /// Query parameters for one window, in wire order
    fn query_params(&self, window: &DayWindow) -> [(&'static str, String); 5] {
        [
            ("skey", self.api_token.clone()),
            ("content", "json".to_string()),
            ("begin", window.begin().to_string()),
            ("end", window.end().to_string()),
            ("get", "telemetry".to_string()),
        ]
    }
}

#[async_trait]
impl MileageSource for TelemetryHttpClient {
    async fn fetch_mileage(&self, window: &DayWindow) -> FetcherResult<Measurement> {
        let params = self.query_params(window);
        debug!(
            date = %window.date(),
            begin = %window.begin(),
            end = %window.end(),
            "Requesting telemetry"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| FetcherError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetcherError::HttpError(format!("unexpected status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetcherError::NetworkError(format!("Failed to read body: {e}")))?;

        let parsed: TelemetryResponse = serde_json::from_slice(&body)
            .map_err(|e| FetcherError::MalformedResponse(format!("Failed to decode body: {e}")))?;

        Ok(Measurement::from_meters(window.date(), parsed.mileage))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
