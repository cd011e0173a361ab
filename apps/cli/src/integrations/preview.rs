//! # Preview
//!
//! Shows a generated invoice: either the first page as plain text on the
//! terminal, or the written PDF in the desktop's default viewer.

use std::io::{self, Write};
use std::path::Path;

use invoicer_document::InvoiceDocument;
use tracing::info;

use super::{run_command, IntegrationError, IntegrationResult};

pub trait Previewer {
    /// Presents `document`, which has already been written to `path`.
    fn preview(&mut self, document: &InvoiceDocument, path: &Path) -> IntegrationResult<()>;
}

// =============================================================================
// Text Preview
// =============================================================================

/// Writes the first page as text.
///
/// ```text
/// Preview of invoices/Invoice_0007.pdf (page 1 of 1)
/// ────────────────────────────────────────────────────
/// INVOICE
/// Invoice No: 0007 Date: 2026-10-19
/// ...
/// ```
pub struct TextPreview<W: Write> {
    out: W,
}

impl TextPreview<io::Stdout> {
    pub fn stdout() -> Self {
        TextPreview::new(io::stdout())
    }
}

impl<W: Write> TextPreview<W> {
    pub fn new(out: W) -> Self {
        TextPreview { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Previewer for TextPreview<W> {
    fn preview(&mut self, document: &InvoiceDocument, path: &Path) -> IntegrationResult<()> {
        let first_page = document
            .page_text(0)
            .map_err(|e| IntegrationError::Preview(e.to_string()))?;

        let write_err = |e: io::Error| IntegrationError::Preview(e.to_string());
        writeln!(
            self.out,
            "Preview of {} (page 1 of {})",
            path.display(),
            document.page_count()
        )
        .map_err(write_err)?;
        writeln!(self.out, "{}", "─".repeat(52)).map_err(write_err)?;
        writeln!(self.out, "{}", first_page).map_err(write_err)?;
        self.out.flush().map_err(write_err)
    }
}

// =============================================================================
// System Viewer
// =============================================================================

/// Opens the written PDF with the desktop's default application.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl Previewer for SystemViewer {
    fn preview(&mut self, _document: &InvoiceDocument, path: &Path) -> IntegrationResult<()> {
        let file = path.to_string_lossy();
        let (program, leading) = opener_command();
        let mut args: Vec<&str> = leading;
        args.push(file.as_ref());

        run_command(program, &args)?;
        info!(path = %path.display(), viewer = program, "Opened document");
        Ok(())
    }
}

/// Program and leading arguments that open a file with its default app.
fn opener_command() -> (&'static str, Vec<&'static str>) {
    if cfg!(windows) {
        // `start` takes the first quoted argument as a window title
        ("cmd", vec!["/C", "start", ""])
    } else if cfg!(target_os = "macos") {
        ("open", vec![])
    } else {
        ("xdg-open", vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicer_document::Page;
    use std::path::PathBuf;

    fn document_with(pages: Vec<Page>) -> InvoiceDocument {
        InvoiceDocument {
            title: "Invoice 0007".to_string(),
            pages,
        }
    }

    #[test]
    fn test_text_preview_prints_first_page() {
        let mut first = Page::default();
        first.push(invoicer_document::Element::Text {
            x: 105.0,
            y: 30.0,
            size: 20.0,
            weight: invoicer_document::FontWeight::Bold,
            align: invoicer_document::Align::Center,
            text: "INVOICE".to_string(),
        });
        let document = document_with(vec![first, Page::default()]);

        let mut preview = TextPreview::new(Vec::new());
        preview
            .preview(&document, &PathBuf::from("invoices/Invoice_0007.pdf"))
            .unwrap();

        let text = String::from_utf8(preview.into_inner()).unwrap();
        assert!(text.starts_with("Preview of invoices/Invoice_0007.pdf (page 1 of 2)\n"));
        assert!(text.ends_with("INVOICE\n"));
    }

    #[test]
    fn test_text_preview_of_empty_document_fails() {
        let mut preview = TextPreview::new(Vec::new());
        let err = preview
            .preview(&document_with(vec![]), Path::new("x.pdf"))
            .unwrap_err();
        assert!(matches!(err, IntegrationError::Preview(_)));
    }

    #[test]
    fn test_opener_command_for_platform() {
        let (program, _) = opener_command();
        if cfg!(windows) {
            assert_eq!(program, "cmd");
        } else if cfg!(target_os = "macos") {
            assert_eq!(program, "open");
        } else {
            assert_eq!(program, "xdg-open");
        }
    }
}
