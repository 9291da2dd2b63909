//! Sheet export to CSV and xlsx

use std::sync::Arc;
use std::time::Duration;

use calamine::{open_workbook, Data, Reader, Xlsx};
use tempfile::TempDir;
use vehicle_mileage_downloader::cli::run::run_pipeline;
use vehicle_mileage_downloader::cli::RunOutcome;
use vehicle_mileage_downloader::downloader::Aggregate;
use vehicle_mileage_downloader::output::csv::CsvSheetWriter;
use vehicle_mileage_downloader::output::{sink_for_path, ExportSink};
use vehicle_mileage_downloader::shutdown::CancellationSignal;
use vehicle_mileage_downloader::Measurement;

use crate::support::{config, date, ScriptedSource};

fn measurements() -> Vec<Measurement> {
    (1..=28u32)
        .map(|day| Measurement::from_meters(date(2024, 2, day), f64::from(day) * 1234.5))
        .collect()
}

#[test]
fn export_is_byte_identical_for_any_insert_order() {
    let temp_dir = TempDir::new().unwrap();

    let forward: Aggregate = measurements().into_iter().collect();
    let backward: Aggregate = measurements().into_iter().rev().collect();
    let mut interleaved = measurements();
    interleaved.sort_by_key(|m| (chrono::Datelike::day(&m.date) % 5, m.date));
    let interleaved: Aggregate = interleaved.into_iter().collect();

    let mut outputs = Vec::new();
    for (i, aggregate) in [forward, backward, interleaved].iter().enumerate() {
        let path = temp_dir.path().join(format!("sheet-{i}.csv"));
        let rows = CsvSheetWriter::new(&path).export(aggregate).unwrap();
        assert_eq!(rows, 28);
        outputs.push(std::fs::read(&path).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[0], outputs[2]);
}

#[test]
fn export_overwrites_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sheet.csv");
    std::fs::write(&path, "stale,contents\nmore,rows\nand,more\n").unwrap();

    let aggregate: Aggregate = vec![Measurement::from_meters(date(2024, 2, 1), 10.0)]
        .into_iter()
        .collect();
    CsvSheetWriter::new(&path).export(&aggregate).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "2024-02-01,0.01\n");
}

#[test]
fn export_has_one_row_per_distinct_date() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dedup.csv");

    let mut all = measurements();
    all.push(Measurement::from_meters(date(2024, 2, 3), 99_000.0));
    let aggregate: Aggregate = all.into_iter().collect();

    let rows = CsvSheetWriter::new(&path).export(&aggregate).unwrap();
    assert_eq!(rows, 28);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.lines().any(|l| l == "2024-02-03,99"));
    assert_eq!(contents.lines().count(), 28);
}

fn workbook_rows(path: &std::path::Path) -> Vec<(String, f64)> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range
        .rows()
        .map(|row| match row {
            [Data::String(date), Data::Float(km)] => (date.clone(), *km),
            other => panic!("unexpected row: {other:?}"),
        })
        .collect()
}

#[test]
fn xlsx_extension_writes_a_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mileage.xlsx");
    let aggregate: Aggregate = measurements().into_iter().rev().collect();

    let rows = sink_for_path(&path).export(&aggregate).unwrap();
    assert_eq!(rows, 28);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");

    let rows = workbook_rows(&path);
    assert_eq!(rows.len(), 28);
    assert_eq!(rows[0], ("2024-02-01".to_string(), 1.2345));
    assert_eq!(rows[27], ("2024-02-28".to_string(), 34.566));
    assert!(rows.windows(2).all(|pair| pair[0].0 < pair[1].0));
}

#[test]
fn csv_extension_keeps_plain_text() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mileage.CSV");
    let aggregate: Aggregate = vec![Measurement::from_meters(date(2024, 2, 1), 1500.0)]
        .into_iter()
        .collect();

    sink_for_path(&path).export(&aggregate).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "2024-02-01,1.5\n");
}

#[tokio::test]
async fn pipeline_saves_workbook_for_xlsx_target() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("mileage.xlsx");
    let config = config(date(2024, 3, 1), date(2024, 3, 5), &output);
    let source = ScriptedSource::responding([
        (date(2024, 3, 4), 4000.0, Duration::ZERO),
        (date(2024, 3, 2), 2000.0, Duration::from_millis(20)),
        (date(2024, 3, 3), 3000.0, Duration::from_millis(10)),
    ]);

    let outcome = run_pipeline(&config, Arc::new(source), CancellationSignal::shared(), false)
        .await
        .unwrap();
    assert_eq!(outcome.exit_code(), 0);
    assert!(matches!(outcome, RunOutcome::Saved { rows: 3, .. }));

    assert_eq!(
        workbook_rows(&output),
        vec![
            ("2024-03-02".to_string(), 2.0),
            ("2024-03-03".to_string(), 3.0),
            ("2024-03-04".to_string(), 4.0),
        ]
    );
}
