//! # Document Error Types
//!
//! ```text
//! assemble()  ── infallible (pure layout)
//! render_pdf() ─► DocumentError::Render
//! write()     ─► DocumentError::Write   (nothing left at the destination)
//! page_text() ─► DocumentError::PageOutOfRange
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// The PDF writer failed to serialize the layout.
    #[error("Failed to render document: {0}")]
    Render(String),

    /// The document could not be written to its destination.
    ///
    /// ## When This Occurs
    /// - Destination directory missing or not writable
    /// - Disk full
    /// - Rename over an existing file refused by the OS
    #[error("Failed to write document {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Requested page does not exist.
    #[error("Page {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}

impl DocumentError {
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        DocumentError::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
