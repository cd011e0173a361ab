//! Invoice commands: `generate`, `preview`, `print`, `printers`,
//! `next-number`, `history`, `amount`.
//!
//! `preview` and `print` generate first, exactly like `generate`, then hand
//! the written document to a collaborator. A collaborator failure is
//! reported after the fact; the document and the advanced draft stay, and
//! the error names the saved document.

use serde::Serialize;
use tracing::{info, warn};

use invoicer_core::{format_sequence_number, CoreError, InvoiceRecord};

use super::AppContext;
use crate::error::{AppError, ErrorCode};
use crate::integrations::{resolve_printer, IntegrationError, PrintBackend, Previewer};
use crate::workflow::{self, GenerateOutcome};

pub fn generate(ctx: &AppContext) -> Result<GenerateOutcome, AppError> {
    let mut session = ctx.load_session()?;
    let options = ctx.layout_options()?;
    workflow::generate(&mut session, &ctx.store, &options)
}

/// Outcome of `preview`, with the page text when it was captured.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewView {
    #[serde(flatten)]
    pub outcome: GenerateOutcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Generates the draft and shows it with `previewer`.
pub fn preview(ctx: &AppContext, previewer: &mut dyn Previewer) -> Result<GenerateOutcome, AppError> {
    let mut session = ctx.load_session()?;
    if session.draft().items.is_empty() {
        return Err(CoreError::NoItems.into());
    }

    let options = ctx.layout_options()?;
    let outcome = workflow::generate(&mut session, &ctx.store, &options)?;
    previewer
        .preview(&outcome.document, &outcome.path)
        .map_err(|e| saved_but(&outcome, e))?;
    Ok(outcome)
}

/// Outcome of `print`.
#[derive(Debug, Clone, Serialize)]
pub struct PrintJob {
    #[serde(flatten)]
    pub outcome: GenerateOutcome,

    pub backend: &'static str,

    /// Destination; `None` lets the OS choose.
    pub printer: Option<String>,
}

/// Generates the draft and sends it to a printer.
pub fn print(
    ctx: &AppContext,
    backend: &dyn PrintBackend,
    requested: Option<&str>,
) -> Result<PrintJob, AppError> {
    let mut session = ctx.load_session()?;
    if session.draft().items.is_empty() {
        return Err(CoreError::NoItems.into());
    }

    let options = ctx.layout_options()?;
    let outcome = workflow::generate(&mut session, &ctx.store, &options)?;

    let printer = resolve_printer(requested, ctx.config.printer.as_deref(), backend);
    backend
        .print(&outcome.path, printer.as_deref())
        .map_err(|e| saved_but(&outcome, e))?;
    info!(
        sequence_number = outcome.record.sequence_number,
        printer = ?printer,
        "Invoice sent to printer"
    );

    Ok(PrintJob {
        outcome,
        backend: backend.name(),
        printer,
    })
}

/// Collaborator failure after the document was written and logged.
fn saved_but(outcome: &GenerateOutcome, err: IntegrationError) -> AppError {
    warn!(path = %outcome.path.display(), "Invoice saved but not delivered: {}", err);
    let next = outcome
        .next_number
        .map(|n| format!("; next invoice is {}", format_sequence_number(n)))
        .unwrap_or_default();
    AppError::new(
        ErrorCode::IntegrationFailure,
        format!(
            "{} (invoice {} was saved to {}{})",
            err,
            format_sequence_number(outcome.record.sequence_number),
            outcome.path.display(),
            next
        ),
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct PrintersView {
    pub backend: &'static str,
    pub printers: Vec<String>,
    pub default: Option<String>,
}

pub fn printers(backend: &dyn PrintBackend) -> Result<PrintersView, AppError> {
    let printers = backend.list_printers()?;
    let default = backend.default_printer().unwrap_or_else(|e| {
        warn!(backend = backend.name(), "Cannot query default printer: {}", e);
        None
    });

    Ok(PrintersView {
        backend: backend.name(),
        printers,
        default,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct NextNumberView {
    pub next_number: u32,
    pub label: String,
}

pub fn next_number(ctx: &AppContext) -> NextNumberView {
    let next_number = ctx.store.sequence().next_number();
    NextNumberView {
        next_number,
        label: format_sequence_number(next_number),
    }
}

/// Every logged invoice, oldest first.
pub fn history(ctx: &AppContext) -> Result<Vec<InvoiceRecord>, AppError> {
    Ok(ctx.store.records().read_all()?)
}

/// An amount as the document would print it.
#[derive(Debug, Clone, Serialize)]
pub struct AmountView {
    pub input: String,
    pub formatted: String,
    /// Plain decimal value; "0.00" when the input is not a number.
    pub value: String,
}

/// Formats `text` with the configured currency. Never fails on bad input.
pub fn amount(ctx: &AppContext, text: &str) -> Result<AmountView, AppError> {
    let currency = ctx.currency()?;
    Ok(AmountView {
        input: text.to_string(),
        formatted: currency.format_text(text),
        value: currency.parse(text).to_decimal_string(),
    })
}
