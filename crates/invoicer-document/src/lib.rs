//! # invoicer-document: Invoice Document Assembly
//!
//! Lays out an invoice as a fixed-structure, paginated A4 document and
//! renders it to PDF.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  InvoiceDraft + ComputedTotals + LayoutOptions                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  assemble()          (assembler.rs)  pure, paginates, measures text     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceDocument     (layout.rs)     pages of positioned elements       │
//! │       │                    │                                            │
//! │       │                    └──► page_text(i)  plain-text preview        │
//! │       ▼                                                                 │
//! │  render_pdf()        (pdf.rs)        lopdf, Helvetica, WinAnsi          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write_document()    temp file in destination dir + atomic rename       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use invoicer_document::{assemble, LayoutOptions};
//!
//! let totals = invoicer_core::compute(&draft.items, draft.tax_rate);
//! let document = assemble(&draft, &totals, &LayoutOptions::default());
//! document.write(&store.document_path(draft.sequence_number))?;
//! ```

pub mod assembler;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod pdf;

pub use assembler::{assemble, LayoutOptions};
pub use error::{DocumentError, DocumentResult};
pub use layout::{Align, Element, FontWeight, InvoiceDocument, Page};
pub use pdf::{render_pdf, write_document};
