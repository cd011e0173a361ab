//! # invoicer-store: Durable Files for Invoicer
//!
//! This crate owns the output directory: generated documents, the
//! append-only record log, and the sequence allocator that reads it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Invoicer Data Flow                               │
//! │                                                                         │
//! │  invoicer generate                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  invoicer-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  RecordLog    │    │  Sequence    │  │   │
//! │  │   │  (store.rs)   │    │(record_log.rs)│    │  Allocator   │  │   │
//! │  │   │               │    │               │    │(sequence.rs) │  │   │
//! │  │   │ output dir    │───►│ append()      │◄───│ next_number()│  │   │
//! │  │   │ Invoice_N.pdf │    │ read_all()    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  invoices/                                                      │   │
//! │  │  ├── invoices.csv        invoice_no,date,buyer,subtotal,tax,total│  │
//! │  │  ├── Invoice_0001.pdf                                           │   │
//! │  │  └── Invoice_0002.pdf                                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Output directory layout and the `Store` handle
//! - [`record_log`] - Append-only CSV log of generated invoices
//! - [`sequence`] - Next invoice number
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use invoicer_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("invoices"))?;
//! let number = store.sequence().next_number();
//! store.records().append(&draft.to_record(&totals))?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod record_log;
pub mod sequence;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use record_log::RecordLog;
pub use sequence::SequenceAllocator;
pub use store::{Store, StoreConfig};

/// Header row of the record log.
pub const LOG_HEADER: [&str; 6] = ["invoice_no", "date", "buyer", "subtotal", "tax", "total"];
