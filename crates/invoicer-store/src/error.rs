//! # Store Error Types
//!
//! Error types for output directory and record log operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / csv::Error                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the path involved                     │
//! │       │                                                                 │
//! │       ├──► SequenceAllocator: logged as a warning, falls back          │
//! │       ▼                                                                 │
//! │  AppError (in the CLI) ← RecordWarning on append, exit code otherwise  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output directory and record log errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    ///
    /// ## When This Occurs
    /// - Output directory can't be created
    /// - Log file can't be opened for append
    /// - Disk full, permissions
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer failed.
    #[error("Record log error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A log row could not be interpreted.
    ///
    /// ## When This Occurs
    /// - First column of the last row is not a number
    /// - A row written by hand has missing or garbled fields
    #[error("Malformed record log {} at row {row}: {reason}", path.display())]
    MalformedLog {
        path: PathBuf,
        row: usize,
        reason: String,
    },
}

impl StoreError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn malformed(path: impl AsRef<Path>, row: usize, reason: impl Into<String>) -> Self {
        StoreError::MalformedLog {
            path: path.as_ref().to_path_buf(),
            row,
            reason: reason.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
