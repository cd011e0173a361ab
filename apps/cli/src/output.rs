//! Output Formatting
//!
//! Text renderers for every command result, plus the JSON path used with
//! `--format json`. Renderers are pure and return the text; only the
//! `print_*` helpers touch stdout/stderr.

use std::fmt::Write as _;

use serde::Serialize;

use invoicer_core::{format_sequence_number, CurrencyFormat, InvoiceRecord, LineItem};

use crate::commands::draft::DraftView;
use crate::commands::invoice::{PrintJob, PrintersView};
use crate::commands::item::{ItemAction, ItemChange};
use crate::commands::OutputFormat;
use crate::error::AppError;
use crate::workflow::GenerateOutcome;

/// Prints `data` as JSON, or the text produced by `text`.
pub fn emit<T, F>(format: OutputFormat, data: &T, text: F) -> Result<(), AppError>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Text => {
            print_text(&text());
            Ok(())
        }
    }
}

/// Print as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| AppError::internal(format!("Error formatting JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub fn print_text(text: &str) {
    println!("{}", text);
}

/// Print error message
pub fn print_error(error: &AppError, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(error) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("Error: {}", error),
        },
        OutputFormat::Text => eprintln!("Error: {}", error),
    }
}

/// Reports a failed record-log append on stderr.
pub fn warn_record(outcome: &GenerateOutcome) {
    if let Some(warning) = &outcome.record_warning {
        eprintln!("Warning: {}", warning);
    }
}

// =============================================================================
// Draft
// =============================================================================

pub fn render_draft(view: &DraftView, currency: &CurrencyFormat) -> String {
    let draft = &view.draft;
    let mut out = String::new();

    let _ = writeln!(out, "Invoice No: {}    Date: {}", draft.number_label(), draft.date);
    let _ = writeln!(out, "Draft: {}", view.path.display());
    let _ = writeln!(out);

    let _ = writeln!(out, "Seller:");
    push_block(&mut out, &draft.seller_info);
    let _ = writeln!(out, "Buyer:");
    push_block(&mut out, &draft.buyer_info());
    let _ = writeln!(out);

    if draft.items.is_empty() {
        let _ = writeln!(out, "No line items.");
    } else {
        out.push_str(&render_items(&draft.items, currency));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{:<16}{:>14}", "Subtotal:", currency.format(view.totals.subtotal));
    let _ = writeln!(
        out,
        "{:<16}{:>14}",
        format!("Tax ({}%):", draft.tax_rate.display_percent()),
        currency.format(view.totals.tax_amount)
    );
    let _ = write!(out, "{:<16}{:>14}", "GRAND TOTAL:", currency.format(view.totals.grand_total));

    if !draft.notes.trim().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out);
        let _ = writeln!(out, "Notes:");
        push_block(&mut out, &draft.notes);
        out.pop();
    }
    out
}

/// Item table with the same columns as the document.
pub fn render_items(items: &[LineItem], currency: &CurrencyFormat) -> String {
    let width = items
        .iter()
        .map(|i| i.description.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(11, 40);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<width$}  {:>6}  {:>14}  {:>14}",
        "#", "Description", "Qty", "Unit Price", "Total",
    );
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {:>6}  {:>14}  {:>14}",
            i + 1,
            item.description,
            item.quantity,
            currency.format(item.unit_price),
            currency.format(item.line_total()),
        );
    }
    out
}

fn push_block(out: &mut String, text: &str) {
    if text.trim().is_empty() {
        out.push_str("  (not set)\n");
        return;
    }
    for line in text.lines() {
        let _ = writeln!(out, "  {}", line);
    }
}

// =============================================================================
// Items
// =============================================================================

pub fn render_item_change(change: &ItemChange, currency: &CurrencyFormat) -> String {
    let mut out = String::new();

    match (change.action, change.index, &change.item) {
        (ItemAction::Cleared, _, _) => {
            let _ = writeln!(out, "Removed {} items", change.removed.unwrap_or(0));
        }
        (ItemAction::Removed, Some(index), Some(item)) => {
            let _ = writeln!(out, "Removed item #{}: {}", index, item.description);
        }
        (action, Some(index), Some(item)) => {
            let verb = if action == ItemAction::Added { "Added" } else { "Updated" };
            let _ = writeln!(
                out,
                "{} item #{}: {} x {} @ {} = {}",
                verb,
                index,
                item.description,
                item.quantity,
                currency.format(item.unit_price),
                currency.format(item.line_total()),
            );
        }
        _ => {}
    }

    let _ = write!(
        out,
        "Items: {}  Subtotal: {}  Tax: {}  Total: {}",
        change.item_count,
        currency.format(change.totals.subtotal),
        currency.format(change.totals.tax_amount),
        currency.format(change.totals.grand_total),
    );
    out
}

// =============================================================================
// Generation
// =============================================================================

pub fn render_generated(outcome: &GenerateOutcome, currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    let pages = if outcome.page_count == 1 { "page" } else { "pages" };

    let _ = writeln!(
        out,
        "Invoice saved to: {} ({} {})",
        outcome.path.display(),
        outcome.page_count,
        pages
    );
    let _ = writeln!(out, "{:<14}{:>14}", "Subtotal:", currency.format(outcome.totals.subtotal));
    let _ = writeln!(out, "{:<14}{:>14}", "Tax:", currency.format(outcome.totals.tax_amount));
    let _ = write!(out, "{:<14}{:>14}", "GRAND TOTAL:", currency.format(outcome.totals.grand_total));

    if let Some(next) = outcome.next_number {
        let _ = write!(out, "\nNext invoice number: {}", format_sequence_number(next));
    }
    out
}

pub fn render_print_job(job: &PrintJob, currency: &CurrencyFormat) -> String {
    let destination = match &job.printer {
        Some(name) => format!("printer {}", name),
        None => "the system default printer".to_string(),
    };
    format!(
        "{}\nSent to {}",
        render_generated(&job.outcome, currency),
        destination
    )
}

// =============================================================================
// Printers / History
// =============================================================================

pub fn render_printers(view: &PrintersView) -> String {
    if view.printers.is_empty() {
        return "No printers found.".to_string();
    }

    view.printers
        .iter()
        .map(|name| {
            let marker = if view.default.as_deref() == Some(name.as_str()) {
                "*"
            } else {
                " "
            };
            format!("{} {}", marker, name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_history(records: &[InvoiceRecord], currency: &CurrencyFormat) -> String {
    if records.is_empty() {
        return "No invoices logged yet.".to_string();
    }

    let width = records
        .iter()
        .map(|r| r.buyer.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(5, 30);

    let mut lines = vec![format!(
        "{:<7}  {:<10}  {:<width$}  {:>14}  {:>14}  {:>14}",
        "Invoice", "Date", "Buyer", "Subtotal", "Tax", "Total",
    )];
    for record in records {
        lines.push(format!(
            "{:<7}  {:<10}  {:<width$}  {:>14}  {:>14}  {:>14}",
            format_sequence_number(record.sequence_number),
            record.date.to_string(),
            record.buyer,
            currency.format(record.subtotal),
            currency.format(record.tax),
            currency.format(record.total),
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use invoicer_core::{compute, InvoiceDraft, Money, TaxRate};
    use std::path::PathBuf;

    fn scenario_view() -> DraftView {
        let mut draft = InvoiceDraft::new(
            7,
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            "Acme Traders\nMumbai",
            TaxRate::from_percentage(18.0),
        );
        draft.buyer_name = "Globex Ltd".to_string();
        draft.items = vec![
            LineItem::new("Widget", 2, Money::from_cents(1000)),
            LineItem::new("Service", 1, Money::from_cents(5000)),
        ];
        let totals = compute(&draft.items, draft.tax_rate);
        DraftView {
            path: PathBuf::from("invoice-draft.json"),
            draft,
            totals,
        }
    }

    #[test]
    fn test_render_draft() {
        let text = render_draft(&scenario_view(), &CurrencyFormat::default());

        assert!(text.starts_with("Invoice No: 0007    Date: 2026-10-19\n"));
        assert!(text.contains("Seller:\n  Acme Traders\n  Mumbai\n"));
        assert!(text.contains("Buyer:\n  Globex Ltd\n"));
        assert!(text.contains("  1  Widget            2          ₹10.00          ₹20.00\n"));
        assert!(text.contains("Tax (18.00%):           ₹12.60"));
        assert!(text.ends_with("GRAND TOTAL:            ₹82.60"));
    }

    #[test]
    fn test_render_draft_without_items_or_buyer() {
        let mut view = scenario_view();
        view.draft.items.clear();
        view.draft.buyer_name.clear();
        view.draft.notes = "Net 30".to_string();
        view.totals = compute(&[], view.draft.tax_rate);

        let text = render_draft(&view, &CurrencyFormat::default());
        assert!(text.contains("Buyer:\n  (not set)\n"));
        assert!(text.contains("No line items."));
        assert!(text.ends_with("Notes:\n  Net 30"));
    }

    #[test]
    fn test_render_history() {
        let records = vec![InvoiceRecord {
            sequence_number: 1,
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            buyer: "Globex Ltd".to_string(),
            subtotal: Money::from_cents(7000),
            tax: Money::from_cents(1260),
            total: Money::from_cents(8260),
        }];

        let text = render_history(&records, &CurrencyFormat::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("0001     2026-10-19  Globex Ltd"));
        assert!(lines[1].ends_with("₹82.60"));

        assert_eq!(
            render_history(&[], &CurrencyFormat::default()),
            "No invoices logged yet."
        );
    }

    #[test]
    fn test_render_printers_marks_default() {
        let view = PrintersView {
            backend: "lp",
            printers: vec!["Office".to_string(), "Label".to_string()],
            default: Some("Label".to_string()),
        };
        assert_eq!(render_printers(&view), "  Office\n* Label");
    }
}
