//! # Sequence Allocator
//!
//! Derives the next invoice number from the record log.
//!
//! ## Decision Table
//! ```text
//! ┌──────────────────────────────────────────┬──────────────────────────────┐
//! │ Record log state                         │ next_number()                │
//! ├──────────────────────────────────────────┼──────────────────────────────┤
//! │ absent / empty / header only             │ 1                            │
//! │ last data row starts with N              │ N + 1                        │
//! │ last row unparseable, I/O error, N = MAX │ count(Invoice_*.pdf) + 1     │
//! └──────────────────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! The allocator never returns an error. Falling back is logged as a
//! warning. It reserves nothing: two sessions asking at the same time get
//! the same number.

use tracing::{debug, warn};

use crate::store::Store;

/// Computes the next invoice number for a store.
#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    store: Store,
}

impl SequenceAllocator {
    pub fn new(store: Store) -> Self {
        SequenceAllocator { store }
    }

    /// Returns the number the next generated invoice should carry.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let number = store.sequence().next_number();
    /// draft.sequence_number = number;
    /// ```
    pub fn next_number(&self) -> u32 {
        let log = self.store.records();

        match log.last_sequence_number() {
            Ok(None) => {
                debug!(path = %log.path().display(), "Record log empty, starting at 1");
                1
            }
            Ok(Some(last)) => match last.checked_add(1) {
                Some(next) => {
                    debug!(last, next, "Next invoice number from record log");
                    next
                }
                None => {
                    warn!(last, "Invoice number overflow, counting documents instead");
                    self.from_document_count()
                }
            },
            Err(e) => {
                warn!(
                    error = %e,
                    path = %log.path().display(),
                    "Record log unreadable, counting documents instead"
                );
                self.from_document_count()
            }
        }
    }

    fn from_document_count(&self) -> u32 {
        match self.store.count_documents() {
            Ok(count) => u32::try_from(count)
                .unwrap_or(u32::MAX)
                .saturating_add(1),
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.store.output_dir().display(),
                    "Could not count documents, starting at 1"
                );
                1
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
