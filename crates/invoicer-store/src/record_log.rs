//! # Record Log
//!
//! Append-only CSV log with one summary row per generated document.
//!
//! ## File Format
//! ```text
//! invoice_no,date,buyer,subtotal,tax,total
//! 1,2026-10-19,Globex Ltd,70.00,12.60,82.60
//! 2,2026-10-19,"Initech, Inc",50.00,9.00,59.00
//! ```
//!
//! ## Guarantees (and the lack of them)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append()                                                               │
//! │  ├── header written when the file is absent OR empty                   │
//! │  ├── no dedup: generating twice logs the same number twice             │
//! │  └── a crash mid-write may leave a truncated last row                  │
//! │                                                                         │
//! │  read_all()                                                            │
//! │  ├── header rows are skipped wherever they appear                      │
//! │  └── amounts like "70.0" (older writers) are accepted                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use invoicer_core::InvoiceRecord;

use crate::error::{StoreError, StoreResult};
use crate::LOG_HEADER;

/// Handle on the record log file.
#[derive(Debug, Clone)]
pub struct RecordLog {
    path: PathBuf,
}

impl RecordLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let record = draft.to_record(&totals);
    /// store.records().append(&record)?;
    /// ```
    pub fn append(&self, record: &InvoiceRecord) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let needs_header = file
            .metadata()
            .map_err(|e| StoreError::io(&self.path, e))?
            .len()
            == 0;

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer
            .serialize(record)
            .map_err(|e| StoreError::csv(&self.path, e))?;
        writer.flush().map_err(|e| StoreError::io(&self.path, e))?;

        info!(
            sequence_number = record.sequence_number,
            path = %self.path.display(),
            "Record appended"
        );
        Ok(())
    }

    /// Reads every record in file order.
    ///
    /// An absent log is empty, not an error.
    pub fn read_all(&self) -> StoreResult<Vec<InvoiceRecord>> {
        let Some(rows) = self.read_rows()? else {
            return Ok(Vec::new());
        };

        let header = StringRecord::from(LOG_HEADER.to_vec());
        let mut records = Vec::with_capacity(rows.len());
        for (row_number, row) in rows {
            let record: InvoiceRecord = row
                .deserialize(Some(&header))
                .map_err(|e| StoreError::malformed(&self.path, row_number, e.to_string()))?;
            records.push(record);
        }

        debug!(path = %self.path.display(), count = records.len(), "Read record log");
        Ok(records)
    }

    /// Invoice number in the first column of the last data row.
    ///
    /// `Ok(None)` when the log is absent, empty or holds only a header.
    /// Only the last row is interpreted, so a garbled older row does not
    /// matter here.
    pub fn last_sequence_number(&self) -> StoreResult<Option<u32>> {
        let Some(rows) = self.read_rows()? else {
            return Ok(None);
        };
        let Some((row_number, last)) = rows.last() else {
            return Ok(None);
        };

        let first = last.get(0).unwrap_or_default();
        first
            .parse::<u32>()
            .map(Some)
            .map_err(|_| {
                StoreError::malformed(
                    &self.path,
                    *row_number,
                    format!("invoice_no {:?} is not a number", first),
                )
            })
    }

    /// Data rows with their 1-based row numbers, header rows removed.
    fn read_rows(&self) -> StoreResult<Option<Vec<(usize, StringRecord)>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let mut rows = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| StoreError::csv(&self.path, e))?;
            if is_header_row(&row) {
                continue;
            }
            rows.push((index + 1, row));
        }
        Ok(Some(rows))
    }
}

fn is_header_row(row: &StringRecord) -> bool {
    row.get(0) == Some(LOG_HEADER[0])
}

// =============================================================================
// Unit Tests
// =============================================================================
