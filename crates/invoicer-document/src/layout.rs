//! # Layout Model
//!
//! A finished document as positioned elements on A4 pages. The assembler
//! produces it, the PDF renderer and the text preview consume it.
//!
//! ## Coordinates
//! ```text
//! (0,0) ───────────────────────────── x (mm) ──► (210,0)
//!   │   ┌───────────────────────────────────┐
//!   │   │ 20mm margin                       │
//!   │   │    Text { x, y = baseline }       │
//!   y   │    Line { x1,y1 → x2,y2 }         │
//!  (mm) │    Fill { x, y = top, w, h }      │
//!   │   │                                   │
//!   ▼   └───────────────────────────────────┘
//! (0,297)
//! ```
//!
//! Millimetres from the top-left corner, like the paper reads. The renderer
//! flips to PDF points from the bottom-left.

use crate::error::{DocumentError, DocumentResult};

/// A4 width in millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;

/// A4 height in millimetres.
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Margin on all four sides.
pub const MARGIN_MM: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Horizontal anchor of a text element: `x` is its left edge, center or
/// right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One positioned drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        align: Align,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
    /// Filled rectangle; `gray` is 0.0 (black) to 1.0 (white).
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
}

/// Elements of one page, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Plain-text rendering: text elements on the same baseline form one
    /// line, ordered left to right and joined by a single space.
    pub fn to_text(&self) -> String {
        let mut cells: Vec<(f32, f32, &str)> = self
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { x, y, text, .. } if !text.is_empty() => {
                    Some((*y, *x, text.as_str()))
                }
                _ => None,
            })
            .collect();
        cells.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut lines: Vec<(f32, Vec<&str>)> = Vec::new();
        for (y, _, text) in cells {
            match lines.last_mut() {
                Some((line_y, parts)) if (*line_y - y).abs() < 0.01 => parts.push(text),
                _ => lines.push((y, vec![text])),
            }
        }

        lines
            .into_iter()
            .map(|(_, parts)| parts.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A laid-out invoice ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    /// Document title stored in the PDF info dictionary.
    pub title: String,
    pub pages: Vec<Page>,
}

impl InvoiceDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Plain text of page `index` (0-based).
    ///
    /// ## Example
    /// ```rust,ignore
    /// let doc = assemble(&draft, &totals, &LayoutOptions::default());
    /// println!("{}", doc.page_text(0)?);
    /// ```
    pub fn page_text(&self, index: usize) -> DocumentResult<String> {
        self.pages
            .get(index)
            .map(Page::to_text)
            .ok_or(DocumentError::PageOutOfRange {
                index,
                count: self.pages.len(),
            })
    }

    /// Plain text of every page, separated by form feeds.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(Page::to_text)
            .collect::<Vec<_>>()
            .join("\n\u{c}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(x: f32, y: f32, align: Align, s: &str) -> Element {
        Element::Text {
            x,
            y,
            size: 10.0,
            weight: FontWeight::Regular,
            align,
            text: s.to_string(),
        }
    }

    #[test]
    fn test_page_text_orders_rows_and_cells() {
        let mut page = Page::default();
        page.push(text(188.0, 60.0, Align::Right, "₹20.00"));
        page.push(text(22.0, 60.0, Align::Left, "1"));
        page.push(text(105.0, 30.0, Align::Center, "INVOICE"));
        page.push(Element::Line {
            x1: 20.0,
            y1: 55.0,
            x2: 190.0,
            y2: 55.0,
            width: 0.5,
        });
        page.push(text(34.0, 60.0, Align::Left, "Widget"));

        assert_eq!(page.to_text(), "INVOICE\n1 Widget ₹20.00");
    }

    #[test]
    fn test_page_text_out_of_range() {
        let doc = InvoiceDocument {
            title: "Invoice 0001".to_string(),
            pages: vec![Page::default()],
        };
        assert_eq!(doc.page_text(0).unwrap(), "");
        assert!(matches!(
            doc.page_text(1),
            Err(DocumentError::PageOutOfRange { index: 1, count: 1 })
        ));
    }
}
