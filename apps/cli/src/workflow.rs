//! # Generate Workflow
//!
//! Turns the session draft into a document on disk and a row in the
//! record log.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    generate()                                           │
//! │                                                                         │
//! │  1. validate_draft()        ── ValidationError ──► abort, nothing written│
//! │  2. compute()               totals                                      │
//! │  3. assemble()              pages                                       │
//! │  4. ensure_output_dir()     ── StoreError ───────► abort               │
//! │  5. write Invoice_NNNN.pdf  ── DocumentError ────► abort, no file      │
//! │  6. append record           ── StoreError ───────► WARNING only        │
//! │  7. next_number()           draft.sequence_number = next               │
//! │  8. session.save()                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 1-6 are [`produce`]; it leaves the draft alone, so producing the
//! same draft twice logs the same number twice. [`generate`] adds 7-8.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use invoicer_core::validation::validate_draft;
use invoicer_core::{compute, ComputedTotals, InvoiceDraft, InvoiceRecord};
use invoicer_document::{assemble, InvoiceDocument, LayoutOptions};
use invoicer_store::Store;

use crate::error::AppError;
use crate::state::Session;

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    /// Where the document was written.
    pub path: PathBuf,

    /// Row appended to the record log.
    pub record: InvoiceRecord,

    pub totals: ComputedTotals,

    pub page_count: usize,

    /// Number the draft now carries, when it was advanced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_number: Option<u32>,

    /// Set when the document was written but the log append failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_warning: Option<String>,

    #[serde(skip)]
    pub document: InvoiceDocument,
}

/// Validates, lays out and writes the draft, then logs it.
///
/// Does not change the draft.
pub fn produce(
    draft: &InvoiceDraft,
    store: &Store,
    options: &LayoutOptions,
) -> Result<GenerateOutcome, AppError> {
    validate_draft(draft)?;

    let totals = compute(&draft.items, draft.tax_rate);
    let document = assemble(draft, &totals, options);

    store.ensure_output_dir()?;
    let path = store.document_path(draft.sequence_number);
    document.write(&path)?;

    let record = draft.to_record(&totals);
    let record_warning = match store.records().append(&record) {
        Ok(()) => None,
        Err(e) => {
            warn!(
                sequence_number = draft.sequence_number,
                "Document written but record not logged: {}", e
            );
            Some(format!("Cannot save invoice record: {}", e))
        }
    };

    info!(
        sequence_number = draft.sequence_number,
        path = %path.display(),
        pages = document.page_count(),
        "Invoice generated"
    );

    Ok(GenerateOutcome {
        path,
        record,
        totals,
        page_count: document.page_count(),
        next_number: None,
        record_warning,
        document,
    })
}

/// Produces the session's draft, then moves the draft on to the next
/// number and saves it. Items and buyer details are kept.
pub fn generate(
    session: &mut Session,
    store: &Store,
    options: &LayoutOptions,
) -> Result<GenerateOutcome, AppError> {
    let mut outcome = produce(session.draft(), store, options)?;

    let next = store.sequence().next_number();
    session.draft_mut().sequence_number = next;
    session.save()?;

    outcome.next_number = Some(next);
    Ok(outcome)
}
