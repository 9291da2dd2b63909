//! Xlsx workbook writer
//!
//! One worksheet (`Sheet1`), no header. Column A holds the date as a
//! `YYYY-MM-DD` string, column B the mileage in km as a number.

use crate::config::DATE_FORMAT;
use crate::downloader::Aggregate;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{create_parent_dir, ExportSink, OutputError, OutputResult};

const DATE_COLUMN: u16 = 0;
const MILEAGE_COLUMN: u16 = 1;

/// Writes the aggregate as a two-column xlsx workbook
pub struct XlsxSheetWriter {
    path: PathBuf,
}

impl XlsxSheetWriter {
    /// Writer targeting `path`; the file is only created on export
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for XlsxSheetWriter {
    fn export(&mut self, aggregate: &Aggregate) -> OutputResult<u64> {
        info!("Creating xlsx workbook: path={}", self.path.display());
        create_parent_dir(&self.path)?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let mut rows_written = 0u64;

        for (row, (date, mileage_km)) in aggregate.rows().enumerate() {
            let row = u32::try_from(row)
                .map_err(|_| OutputError::XlsxError(format!("row {row} exceeds sheet size")))?;
            worksheet
                .write_string(row, DATE_COLUMN, date.format(DATE_FORMAT).to_string())
                .map_err(|e| OutputError::XlsxError(format!("Failed to write date: {e}")))?;
            worksheet
                .write_number(row, MILEAGE_COLUMN, mileage_km)
                .map_err(|e| OutputError::XlsxError(format!("Failed to write mileage: {e}")))?;
            rows_written += 1;
        }

        workbook
            .save(&self.path)
            .map_err(|e| OutputError::XlsxError(format!("Failed to save workbook: {e}")))?;

        info!(
            "Xlsx workbook written: {} rows to {}",
            rows_written,
            self.path.display()
        );
        Ok(rows_written)
    }
}
