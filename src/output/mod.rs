//! Export sinks for the collected aggregate

use crate::downloader::Aggregate;
use std::path::Path;

pub mod csv;
pub mod xlsx;

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    FlushError(String),

    /// Workbook write error
    #[error("xlsx error: {0}")]
    XlsxError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the final date-ordered aggregate
pub trait ExportSink {
    /// Persist every row of `aggregate` in ascending date order.
    ///
    /// Returns the number of rows written.
    fn export(&mut self, aggregate: &Aggregate) -> OutputResult<u64>;
}

/// Pick the sink for `path` by extension: `.csv` gets a CSV sheet, anything
/// else an xlsx workbook.
pub fn sink_for_path(path: &Path) -> Box<dyn ExportSink> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(csv::CsvSheetWriter::new(path))
    } else {
        Box::new(xlsx::XlsxSheetWriter::new(path))
    }
}

pub(crate) fn create_parent_dir(path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::IoError(format!("Failed to create directory: {}", e))
            })?;
        }
    }
    Ok(())
}
