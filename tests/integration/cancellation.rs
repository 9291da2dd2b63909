//! Early termination of the collection loop

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use vehicle_mileage_downloader::cli::run::run_pipeline;
use vehicle_mileage_downloader::cli::RunOutcome;
use vehicle_mileage_downloader::downloader::{CollectionStatus, MileageCollector};
use vehicle_mileage_downloader::partition::partition;
use vehicle_mileage_downloader::shutdown::CancellationSignal;

use crate::support::{config, date, Script, ScriptedSource};

/// Eleven-day range: ten windows reporting 2024-03-02 ..= 2024-03-11.
/// Four days answer (out of order), the others never do.
fn four_of_ten() -> ScriptedSource {
    let mut scripts = HashMap::new();
    for day in 2..=11 {
        scripts.insert(date(2024, 3, day), Script::Hang);
    }
    for (day, delay_ms) in [(9, 100), (3, 200), (6, 300), (2, 400)] {
        scripts.insert(
            date(2024, 3, day),
            Script::Respond {
                meters: f64::from(day) * 1000.0,
                delay: Duration::from_millis(delay_ms),
            },
        );
    }
    ScriptedSource::new(scripts)
}

fn cancel_after(signal: Arc<CancellationSignal>, after: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        signal.cancel();
    });
}

#[tokio::test(start_paused = true)]
async fn cancellation_keeps_collected_days() {
    let windows = partition(date(2024, 3, 1), date(2024, 3, 12), chrono_tz::UTC).unwrap();
    assert_eq!(windows.len(), 10);

    let signal = CancellationSignal::shared();
    cancel_after(signal.clone(), Duration::from_secs(60));

    let collector = MileageCollector::new(Arc::new(four_of_ten()), signal);
    let report = collector.collect(windows).await.unwrap();

    assert_eq!(report.status, CollectionStatus::Cancelled);
    assert_eq!(report.progress.dispatched, 10);
    assert_eq!(report.progress.succeeded, 4);
    assert_eq!(report.progress.pending(), 6);

    let rows: Vec<_> = report.aggregate.rows().collect();
    assert_eq!(
        rows,
        vec![
            (date(2024, 3, 2), 2.0),
            (date(2024, 3, 3), 3.0),
            (date(2024, 3, 6), 6.0),
            (date(2024, 3, 9), 9.0),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn cancelled_run_exports_partial_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("partial.csv");
    let config = config(date(2024, 3, 1), date(2024, 3, 12), &output);

    let signal = CancellationSignal::shared();
    cancel_after(signal.clone(), Duration::from_secs(60));

    let outcome = run_pipeline(&config, Arc::new(four_of_ten()), signal, false)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Saved {
            rows: 4,
            path: output.clone(),
            status: CollectionStatus::Cancelled,
        }
    );
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "2024-03-02,2\n2024-03-03,3\n2024-03-06,6\n2024-03-09,9\n"
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_with_nothing_collected_reports_no_data() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("nothing.csv");
    let config = config(date(2024, 3, 1), date(2024, 3, 5), &output);

    let scripts = (2..=4).map(|d| (date(2024, 3, d), Script::Hang)).collect();
    let signal = CancellationSignal::shared();
    cancel_after(signal.clone(), Duration::from_secs(5));

    let outcome = run_pipeline(&config, Arc::new(ScriptedSource::new(scripts)), signal, false)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::NoData {
            status: CollectionStatus::Cancelled
        }
    );
    assert_eq!(outcome.exit_code(), 1);
    assert!(!output.exists());
}
