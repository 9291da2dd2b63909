//! CSV sheet writer
//!
//! Two columns, no header: `YYYY-MM-DD,<mileage km>`, one row per day with
//! data, ascending by date.

use crate::config::DATE_FORMAT;
use crate::downloader::Aggregate;
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{create_parent_dir, ExportSink, OutputError, OutputResult};

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// Writes the aggregate as a header-less two-column CSV sheet
pub struct CsvSheetWriter {
    path: PathBuf,
    buffer_size: usize,
}

impl CsvSheetWriter {
    /// Writer targeting `path` with the default buffer size.
    ///
    /// The file is only created when [`ExportSink::export`] runs.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::new_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Writer targeting `path` with a custom buffer size
    pub fn new_with_buffer_size<P: AsRef<Path>>(path: P, buffer_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            buffer_size,
        }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> OutputResult<Writer<BufWriter<File>>> {
        info!("Creating CSV sheet: path={}", self.path.display());

        create_parent_dir(&self.path)?;

        let file = File::create(&self.path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;

        let buf_writer = BufWriter::with_capacity(self.buffer_size, file);
        Ok(WriterBuilder::new()
            .has_headers(false)
            .from_writer(buf_writer))
    }
}

impl ExportSink for CsvSheetWriter {
    fn export(&mut self, aggregate: &Aggregate) -> OutputResult<u64> {
        let mut writer = self.open()?;
        let mut rows_written = 0u64;

        for (date, mileage_km) in aggregate.rows() {
            let date = date.format(DATE_FORMAT).to_string();
            let mileage = mileage_km.to_string();
            writer
                .write_record([date.as_str(), mileage.as_str()])
                .map_err(|e| OutputError::CsvError(format!("Failed to write row: {}", e)))?;
            rows_written += 1;
        }

        writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))?;

        // Get inner writer and sync to disk
        let buf_writer = writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {}", e)))?;
        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {}", e)))?;
        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {}", e)))?;

        debug!(rows = rows_written, "CSV sheet closed");
        info!(
            "CSV sheet written: {} rows to {}",
            rows_written,
            self.path.display()
        );
        Ok(rows_written)
    }
}
