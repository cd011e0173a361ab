//! # Output Directory
//!
//! Where generated documents and the record log live, and the `Store`
//! handle that hands out the log and the allocator.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StoreConfig::new("invoices")                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config) ← creates the directory if it is missing          │
//! │       │                                                                 │
//! │       ├── store.log_path()           → invoices/invoices.csv           │
//! │       ├── store.document_path(7)     → invoices/Invoice_0007.pdf       │
//! │       ├── store.records()            → RecordLog                       │
//! │       └── store.sequence()           → SequenceAllocator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use invoicer_core::format_sequence_number;

use crate::error::{StoreError, StoreResult};
use crate::record_log::RecordLog;
use crate::sequence::SequenceAllocator;

// =============================================================================
// Configuration
// =============================================================================

/// Output directory configuration.
///
/// ## Example
/// ```rust
/// use invoicer_store::StoreConfig;
///
/// let config = StoreConfig::new("out").log_file_name("ledger.csv");
/// assert_eq!(config.log_file_name, "ledger.csv");
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding documents and the log.
    /// Default: `invoices`
    pub output_dir: PathBuf,

    /// File name of the record log inside `output_dir`.
    /// Default: `invoices.csv`
    pub log_file_name: String,

    /// Prefix of generated document names.
    /// Default: `Invoice_`
    pub document_prefix: String,
}

impl StoreConfig {
    /// Creates a configuration rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            output_dir: output_dir.into(),
            log_file_name: "invoices.csv".to_string(),
            document_prefix: "Invoice_".to_string(),
        }
    }

    /// Sets the record log file name.
    pub fn log_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = name.into();
        self
    }

    /// Sets the document name prefix.
    pub fn document_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.document_prefix = prefix.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new("invoices")
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle on the output directory.
///
/// Cheap to clone; holds paths only, no open files.
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    /// Creates a handle without touching the filesystem.
    pub fn new(config: StoreConfig) -> Self {
        Store { config }
    }

    /// Creates a handle and makes sure the output directory exists.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let store = Store::new(config);
        store.ensure_output_dir()?;
        Ok(store)
    }

    /// Creates the output directory (and parents) if absent.
    pub fn ensure_output_dir(&self) -> StoreResult<()> {
        let dir = &self.config.output_dir;
        if !dir.is_dir() {
            info!(path = %dir.display(), "Creating output directory");
        }
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Path of the record log.
    pub fn log_path(&self) -> PathBuf {
        self.config.output_dir.join(&self.config.log_file_name)
    }

    /// File name of the document for an invoice number ("Invoice_0007.pdf").
    pub fn document_file_name(&self, sequence_number: u32) -> String {
        format!(
            "{}{}.pdf",
            self.config.document_prefix,
            format_sequence_number(sequence_number)
        )
    }

    /// Full path of the document for an invoice number.
    pub fn document_path(&self, sequence_number: u32) -> PathBuf {
        self.config
            .output_dir
            .join(self.document_file_name(sequence_number))
    }

    /// Counts generated documents (`Invoice_*.pdf`) in the output directory.
    ///
    /// A missing directory counts as zero.
    pub fn count_documents(&self) -> StoreResult<usize> {
        let dir = &self.config.output_dir;
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(dir, e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && self.is_document_name(&entry.file_name().to_string_lossy()) {
                count += 1;
            }
        }

        debug!(path = %dir.display(), count, "Counted generated documents");
        Ok(count)
    }

    fn is_document_name(&self, name: &str) -> bool {
        name.starts_with(&self.config.document_prefix) && name.ends_with(".pdf")
    }

    /// Returns the record log.
    pub fn records(&self) -> RecordLog {
        RecordLog::new(self.log_path())
    }

    /// Returns the sequence allocator.
    pub fn sequence(&self) -> SequenceAllocator {
        SequenceAllocator::new(self.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let store = Store::new(StoreConfig::new("invoices"));
        assert_eq!(store.log_path(), PathBuf::from("invoices/invoices.csv"));
        assert_eq!(
            store.document_path(7),
            PathBuf::from("invoices/Invoice_0007.pdf")
        );
        assert_eq!(store.document_file_name(12345), "Invoice_12345.pdf");
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");

        let store = Store::open(StoreConfig::new(&dir)).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.output_dir(), dir.as_path());
    }

    #[test]
    fn test_count_documents_matches_pattern_only() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(StoreConfig::new(tmp.path())).unwrap();

        for name in [
            "Invoice_0001.pdf",
            "Invoice_0002.pdf",
            "Invoice_draft.pdf",
            "Invoice_0003.txt",
            "invoice_0004.pdf",
            "invoices.csv",
        ] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }
        fs::create_dir(tmp.path().join("Invoice_dir.pdf")).unwrap();

        assert_eq!(store.count_documents().unwrap(), 3);
    }

    #[test]
    fn test_count_documents_missing_dir_is_zero() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(StoreConfig::new(tmp.path().join("missing")));
        assert_eq!(store.count_documents().unwrap(), 0);
    }

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::default()
            .log_file_name("ledger.csv")
            .document_prefix("INV-");
        let store = Store::new(config);

        assert_eq!(store.log_path(), PathBuf::from("invoices/ledger.csv"));
        assert_eq!(store.document_file_name(3), "INV-0003.pdf");
    }
}
