//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use vehicle_mileage_downloader::fetcher::{FetcherError, FetcherResult, MileageSource};
use vehicle_mileage_downloader::window::DayWindow;
use vehicle_mileage_downloader::{AppConfig, Measurement};

/// What the scripted source does for one day
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer with `meters` after `delay`
    Respond { meters: f64, delay: Duration },
    /// Transport failure
    Fail,
    /// Undecodable body
    Malformed,
    /// Never answer
    Hang,
}

/// In-memory telemetry source keyed by reporting date
pub struct ScriptedSource {
    scripts: HashMap<NaiveDate, Script>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(scripts: HashMap<NaiveDate, Script>) -> Self {
        Self {
            scripts,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every window answers `meters` after the given per-day delay
    pub fn responding<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64, Duration)>,
    {
        Self::new(
            entries
                .into_iter()
                .map(|(date, meters, delay)| (date, Script::Respond { meters, delay }))
                .collect(),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MileageSource for ScriptedSource {
    async fn fetch_mileage(&self, window: &DayWindow) -> FetcherResult<Measurement> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.scripts.get(&window.date()).cloned().unwrap_or(Script::Fail) {
            Script::Respond { meters, delay } => {
                tokio::time::sleep(delay).await;
                Ok(Measurement::from_meters(window.date(), meters))
            }
            Script::Fail => Err(FetcherError::NetworkError("connection refused".to_string())),
            Script::Malformed => Err(FetcherError::MalformedResponse(
                "expected value at line 1 column 1".to_string(),
            )),
            Script::Hang => std::future::pending().await,
        }
    }

    fn base_url(&self) -> &str {
        "memory://scripted"
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Configuration for `[from, to)` in UTC writing to `output`
pub fn config(from: NaiveDate, to: NaiveDate, output: &std::path::Path) -> AppConfig {
    let yaml = format!(
        "api_token: test-token\nfile_to_save: {}\ndate_from: \"{}\"\ndate_to: \"{}\"\ntimezone: UTC\n",
        output.display(),
        from,
        to
    );
    AppConfig::from_yaml(&yaml).unwrap()
}

/// Write a configuration file and return its path
pub fn write_config_file(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("config.yaml");
    std::fs::write(&path, body).unwrap();
    path
}
