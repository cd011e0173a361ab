//! # PDF Rendering
//!
//! Serializes an [`InvoiceDocument`] with lopdf and writes it atomically.
//!
//! ## Object Graph
//! ```text
//! Trailer ─► Catalog ─► Pages ─┬─► Page 1 ─► Content stream
//!    │                         ├─► Page 2 ─► Content stream
//!    │                         └─► Resources ─► F1 Helvetica
//!    │                                          F2 Helvetica-Bold
//!    └─► Info { Title, Producer }
//! ```
//!
//! ## Determinism
//! No dates, no document IDs, no compression. Object numbers are assigned
//! in a fixed order, so the same layout always yields the same bytes.
//!
//! ## Atomic Write
//! ```text
//! invoices/.tmpXXXXXX  ◄── write + fsync
//!        │
//!        └── rename ──► invoices/Invoice_0007.pdf
//! ```
//! On any failure the temp file is removed when it drops.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{DocumentError, DocumentResult};
use crate::layout::{Align, Element, FontWeight, InvoiceDocument, Page, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::metrics::{encode_win_ansi, text_width_pt, PT_PER_MM};

const PRODUCER: &str = "invoicer";

/// Renders the document to PDF bytes.
pub fn render_pdf(document: &InvoiceDocument) -> DocumentResult<Vec<u8>> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let bytes = content
            .encode()
            .map_err(|e| DocumentError::Render(e.to_string()))?;
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, bytes));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                pt(PAGE_WIDTH_MM).into(),
                pt(PAGE_HEIGHT_MM).into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(&document.title), StringFormat::Literal),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| DocumentError::Render(e.to_string()))?;

    debug!(pages = document.pages.len(), bytes = out.len(), "Rendered PDF");
    Ok(out)
}

/// Renders the document and writes it to `path` via a temp file and rename.
///
/// The destination directory must already exist.
pub fn write_document(path: &Path, document: &InvoiceDocument) -> DocumentResult<()> {
    let bytes = render_pdf(document)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DocumentError::write(path, e))?;
    tmp.write_all(&bytes)
        .map_err(|e| DocumentError::write(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| DocumentError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| DocumentError::write(path, e.error))?;

    info!(path = %path.display(), bytes = bytes.len(), "Document written");
    Ok(())
}

impl InvoiceDocument {
    pub fn write(&self, path: &Path) -> DocumentResult<()> {
        write_document(path, self)
    }
}

// =============================================================================
// Content Stream
// =============================================================================

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();

    for element in &page.elements {
        match element {
            Element::Fill {
                x,
                y,
                width,
                height,
                gray,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("g", vec![real(*gray)]));
                ops.push(Operation::new(
                    "re",
                    vec![
                        real(pt(*x)),
                        real(pt(PAGE_HEIGHT_MM - *y - *height)),
                        real(pt(*width)),
                        real(pt(*height)),
                    ],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                width,
            } => {
                ops.push(Operation::new("w", vec![real(pt(*width))]));
                ops.push(Operation::new("m", vec![real(pt(*x1)), real(flip(*y1))]));
                ops.push(Operation::new("l", vec![real(pt(*x2)), real(flip(*y2))]));
                ops.push(Operation::new("S", vec![]));
            }
            Element::Text {
                x,
                y,
                size,
                weight,
                align,
                text,
            } => {
                let width = text_width_pt(text, *weight, *size);
                let left = match align {
                    Align::Left => pt(*x),
                    Align::Center => pt(*x) - width / 2.0,
                    Align::Right => pt(*x) - width,
                };
                let font = match weight {
                    FontWeight::Regular => "F1",
                    FontWeight::Bold => "F2",
                };

                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![font.into(), real(*size)]));
                ops.push(Operation::new("Td", vec![real(left), real(flip(*y))]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

fn pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Top-down millimetres to bottom-up points.
fn flip(y_mm: f32) -> f32 {
    pt(PAGE_HEIGHT_MM - y_mm)
}

/// Rounded to two decimals to keep content streams short.
fn real(value: f32) -> Object {
    ((value * 100.0).round() / 100.0).into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble, LayoutOptions};
    use chrono::NaiveDate;
    use invoicer_core::{compute, InvoiceDraft, LineItem, Money, TaxRate};
    use std::fs;
    use tempfile::TempDir;

    fn scenario_document(items: usize) -> InvoiceDocument {
        let mut draft = InvoiceDraft::new(
            7,
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            "Acme Traders",
            TaxRate::from_percentage(18.0),
        );
        draft.buyer_name = "Globex Ltd".to_string();
        draft.buyer_address = "4 Harbour Street".to_string();
        draft.items = (1..=items)
            .map(|i| LineItem::new(format!("Widget {}", i), 2, Money::from_cents(1000)))
            .collect();

        let totals = compute(&draft.items, draft.tax_rate);
        assemble(&draft, &totals, &LayoutOptions::default())
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_render_is_byte_identical() {
        let first = render_pdf(&scenario_document(2)).unwrap();
        let second = render_pdf(&scenario_document(2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rendered_pdf_loads_with_all_pages() {
        let document = scenario_document(60);
        let bytes = render_pdf(&document).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), document.page_count());
        assert!(document.page_count() > 1);
    }

    #[test]
    fn test_content_uses_standard_fonts_and_transliteration() {
        let bytes = render_pdf(&scenario_document(1)).unwrap();
        let loaded = Document::load_mem(&bytes).unwrap();
        let page_id = *loaded.get_pages().get(&1).unwrap();
        let content = loaded.get_page_content(page_id).unwrap();

        assert!(contains(&content, b"(INVOICE) Tj"));
        assert!(contains(&content, b"(Rs.20.00) Tj"));
        assert!(contains(&content, b"(GRAND TOTAL:) Tj"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
        assert!(contains(&bytes, b"/WinAnsiEncoding"));
        assert!(!contains(&bytes, b"CreationDate"));
    }

    #[test]
    fn test_write_document_creates_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Invoice_0007.pdf");
        let document = scenario_document(2);

        write_document(&path, &document).unwrap();

        assert_eq!(fs::read(&path).unwrap(), render_pdf(&document).unwrap());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_document_replaces_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Invoice_0007.pdf");
        fs::write(&path, b"stale").unwrap();

        write_document(&path, &scenario_document(1)).unwrap();
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_into_missing_directory_fails_cleanly() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("Invoice_0007.pdf");

        let err = write_document(&path, &scenario_document(1)).unwrap_err();
        assert!(matches!(err, DocumentError::Write { .. }));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
