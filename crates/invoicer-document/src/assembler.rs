//! # Document Assembler
//!
//! Turns a draft and its totals into a paginated [`InvoiceDocument`].
//!
//! ## Page Structure
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                   INVOICE                    │  title
//! │ Invoice No: 0007            Date: 2026-10-19 │  metadata
//! │ Seller:                Buyer:                │
//! │ Acme Traders           Globex Ltd            │  parties
//! │ 12 Market Road         4 Harbour Street      │
//! │┌──┬─────────────────┬────┬────────┬────────┐ │
//! ││# │ Description     │Qty │Unit Pr.│  Total │ │  shaded header
//! │├──┼─────────────────┼────┼────────┼────────┤ │
//! ││1 │ Widget          │ 2  │ ₹10.00 │ ₹20.00 │ │  item rows
//! │└──┴─────────────────┴────┴────────┴────────┘ │
//! │                        Subtotal:      ₹70.00 │
//! │                   Tax (18.00%):      ₹12.60 │  totals (never split)
//! │                    ───────────────────────── │
//! │                     GRAND TOTAL:      ₹82.60 │
//! │ Notes: ...                                   │  optional
//! │ Thank you for your business!                 │
//! │                 Page 1 of 1                  │  footer
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Rows that do not fit move to a continuation page that starts with the
//! table header again. Seller and buyer blocks longer than the first page
//! continue on the next one line by line.

use invoicer_core::{ComputedTotals, CurrencyFormat, InvoiceDraft, LineItem};
use tracing::debug;

use crate::layout::{
    Align, Element, FontWeight, InvoiceDocument, Page, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use crate::metrics::wrap_text;

// =============================================================================
// Geometry
// =============================================================================

/// Column boundaries of the item table: #, Description, Qty, Unit Price, Total.
const COLUMN_EDGES: [f32; 6] = [20.0, 32.0, 112.0, 130.0, 160.0, 190.0];
const CELL_PAD: f32 = 2.0;

const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;
const LINE_HEIGHT: f32 = 5.0;

const HEADER_HEIGHT: f32 = 8.0;
const ROW_PAD: f32 = 3.0;
const TOTAL_ROW_HEIGHT: f32 = 7.0;
const TOTALS_BLOCK_HEIGHT: f32 = 2.0 + 3.0 * TOTAL_ROW_HEIGHT;

const HEADER_GRAY: f32 = 0.85;
const GRID_WIDTH: f32 = 0.3;
const RULE_WIDTH: f32 = 0.8;

const CONTENT_LEFT: f32 = MARGIN_MM;
const CONTENT_RIGHT: f32 = PAGE_WIDTH_MM - MARGIN_MM;
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT_MM - MARGIN_MM;
const CENTER_X: f32 = PAGE_WIDTH_MM / 2.0;
const BUYER_X: f32 = CENTER_X + 2.0;
const PARTY_WIDTH: f32 = CENTER_X - MARGIN_MM - 2.0;
const FOOTER_Y: f32 = PAGE_HEIGHT_MM - MARGIN_MM / 2.0;

// =============================================================================
// Options
// =============================================================================

/// Presentation settings that do not come from the draft.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub currency: CurrencyFormat,

    /// Heading at the top of the first page.
    pub title: String,

    /// Last line of the document.
    pub closing_line: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            currency: CurrencyFormat::default(),
            title: "INVOICE".to_string(),
            closing_line: "Thank you for your business!".to_string(),
        }
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Lays out a draft. Pure: same inputs, same document.
///
/// `totals` is taken as given; callers compute it from the same draft.
pub fn assemble(
    draft: &InvoiceDraft,
    totals: &ComputedTotals,
    options: &LayoutOptions,
) -> InvoiceDocument {
    let mut flow = PageFlow::new();

    title_block(&mut flow, options);
    metadata_row(&mut flow, draft);
    parties_block(&mut flow, draft);

    table_header(&mut flow);
    for (index, item) in draft.items.iter().enumerate() {
        item_row(&mut flow, index + 1, item, &options.currency);
    }

    totals_block(&mut flow, draft, totals, &options.currency);
    notes_block(&mut flow, &draft.notes);
    closing_line(&mut flow, &options.closing_line);

    let pages = flow.finish();
    debug!(
        sequence_number = draft.sequence_number,
        items = draft.items.len(),
        pages = pages.len(),
        "Document assembled"
    );

    InvoiceDocument {
        title: format!("Invoice {}", draft.number_label()),
        pages,
    }
}

fn title_block(flow: &mut PageFlow, options: &LayoutOptions) {
    let baseline = flow.y + 8.0;
    flow.text(CENTER_X, baseline, TITLE_SIZE, FontWeight::Bold, Align::Center, &options.title);
    flow.y = baseline + 6.0;
}

fn metadata_row(flow: &mut PageFlow, draft: &InvoiceDraft) {
    let baseline = flow.y + 4.0;
    flow.text(
        CONTENT_LEFT,
        baseline,
        BODY_SIZE,
        FontWeight::Regular,
        Align::Left,
        &format!("Invoice No: {}", draft.number_label()),
    );
    flow.text(
        CONTENT_RIGHT,
        baseline,
        BODY_SIZE,
        FontWeight::Regular,
        Align::Right,
        &format!("Date: {}", draft.date.format("%Y-%m-%d")),
    );
    flow.y = baseline + 8.0;
}

fn parties_block(flow: &mut PageFlow, draft: &InvoiceDraft) {
    let seller = wrap_text(&draft.seller_info, FontWeight::Regular, BODY_SIZE, PARTY_WIDTH);
    let buyer = wrap_text(&draft.buyer_info(), FontWeight::Regular, BODY_SIZE, PARTY_WIDTH);

    flow.y += LINE_HEIGHT;
    flow.text(CONTENT_LEFT, flow.y, BODY_SIZE, FontWeight::Bold, Align::Left, "Seller:");
    flow.text(BUYER_X, flow.y, BODY_SIZE, FontWeight::Bold, Align::Left, "Buyer:");

    // One row per line so a long block continues on the next page
    for row in 0..seller.len().max(buyer.len()) {
        if !flow.fits(LINE_HEIGHT) {
            flow.break_page();
        }
        flow.y += LINE_HEIGHT;
        for (x, lines) in [(CONTENT_LEFT, &seller), (BUYER_X, &buyer)] {
            if let Some(line) = lines.get(row) {
                flow.text(x, flow.y, BODY_SIZE, FontWeight::Regular, Align::Left, line);
            }
        }
    }

    flow.y += 8.0;
}

fn table_header(flow: &mut PageFlow) {
    // Keep the header with room for a first row
    if !flow.fits(HEADER_HEIGHT + LINE_HEIGHT + ROW_PAD) {
        flow.break_page();
    }

    let top = flow.y;
    let baseline = top + 5.5;

    flow.push(Element::Fill {
        x: CONTENT_LEFT,
        y: top,
        width: CONTENT_RIGHT - CONTENT_LEFT,
        height: HEADER_HEIGHT,
        gray: HEADER_GRAY,
    });
    flow.hline(top, CONTENT_LEFT, CONTENT_RIGHT, GRID_WIDTH);

    let [c0, c1, c2, c3, c4, c5] = COLUMN_EDGES;
    let bold = FontWeight::Bold;
    flow.text(c0 + CELL_PAD, baseline, BODY_SIZE, bold, Align::Left, "#");
    flow.text(c1 + CELL_PAD, baseline, BODY_SIZE, bold, Align::Left, "Description");
    flow.text((c2 + c3) / 2.0, baseline, BODY_SIZE, bold, Align::Center, "Qty");
    flow.text(c4 - CELL_PAD, baseline, BODY_SIZE, bold, Align::Right, "Unit Price");
    flow.text(c5 - CELL_PAD, baseline, BODY_SIZE, bold, Align::Right, "Total");

    flow.grid_row(top, HEADER_HEIGHT);
    flow.y = top + HEADER_HEIGHT;
}

fn item_row(flow: &mut PageFlow, number: usize, item: &LineItem, currency: &CurrencyFormat) {
    let [c0, c1, c2, c3, c4, c5] = COLUMN_EDGES;
    let description = wrap_text(
        &item.description,
        FontWeight::Regular,
        BODY_SIZE,
        c2 - c1 - 2.0 * CELL_PAD,
    );
    let height = description.len() as f32 * LINE_HEIGHT + ROW_PAD;

    if !flow.fits(height) {
        flow.break_page();
        table_header(flow);
    }

    let top = flow.y;
    let baseline = top + 5.5;
    let regular = FontWeight::Regular;

    flow.text(c0 + CELL_PAD, baseline, BODY_SIZE, regular, Align::Left, &number.to_string());
    for (i, line) in description.iter().enumerate() {
        let y = baseline + i as f32 * LINE_HEIGHT;
        flow.text(c1 + CELL_PAD, y, BODY_SIZE, regular, Align::Left, line);
    }
    flow.text(
        (c2 + c3) / 2.0,
        baseline,
        BODY_SIZE,
        regular,
        Align::Center,
        &item.quantity.to_string(),
    );
    flow.text(
        c4 - CELL_PAD,
        baseline,
        BODY_SIZE,
        regular,
        Align::Right,
        &currency.format(item.unit_price),
    );
    flow.text(
        c5 - CELL_PAD,
        baseline,
        BODY_SIZE,
        regular,
        Align::Right,
        &currency.format(item.line_total()),
    );

    flow.grid_row(top, height);
    flow.y = top + height;
}

fn totals_block(
    flow: &mut PageFlow,
    draft: &InvoiceDraft,
    totals: &ComputedTotals,
    currency: &CurrencyFormat,
) {
    if !flow.fits(TOTALS_BLOCK_HEIGHT) {
        flow.break_page();
    }

    let [_, _, c2, _, c4, c5] = COLUMN_EDGES;
    let rows = [
        ("Subtotal:".to_string(), totals.subtotal),
        (
            format!("Tax ({}%):", draft.tax_rate.display_percent()),
            totals.tax_amount,
        ),
        ("GRAND TOTAL:".to_string(), totals.grand_total),
    ];

    let mut top = flow.y + 2.0;
    for (i, (label, amount)) in rows.iter().enumerate() {
        if i == rows.len() - 1 {
            flow.hline(top, c2, c5, RULE_WIDTH);
        }
        let baseline = top + 5.0;
        flow.text(c4 - CELL_PAD, baseline, BODY_SIZE, FontWeight::Bold, Align::Right, label);
        flow.text(
            c5 - CELL_PAD,
            baseline,
            BODY_SIZE,
            FontWeight::Bold,
            Align::Right,
            &currency.format(*amount),
        );
        top += TOTAL_ROW_HEIGHT;
    }
    flow.y = top;
}

fn notes_block(flow: &mut PageFlow, notes: &str) {
    if notes.trim().is_empty() {
        return;
    }

    let lines = wrap_text(
        notes.trim(),
        FontWeight::Regular,
        BODY_SIZE,
        CONTENT_RIGHT - CONTENT_LEFT,
    );

    flow.y += 6.0;
    // Keep the heading with at least its first line
    if !flow.fits(2.0 * LINE_HEIGHT) {
        flow.break_page();
    }
    flow.y += LINE_HEIGHT;
    flow.text(CONTENT_LEFT, flow.y, BODY_SIZE, FontWeight::Bold, Align::Left, "Notes:");

    for line in &lines {
        if !flow.fits(LINE_HEIGHT) {
            flow.break_page();
        }
        flow.y += LINE_HEIGHT;
        flow.text(CONTENT_LEFT, flow.y, BODY_SIZE, FontWeight::Regular, Align::Left, line);
    }
}

fn closing_line(flow: &mut PageFlow, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    flow.y += 8.0;
    if !flow.fits(LINE_HEIGHT) {
        flow.break_page();
    }
    flow.y += LINE_HEIGHT;
    flow.text(CONTENT_LEFT, flow.y, BODY_SIZE, FontWeight::Regular, Align::Left, text);
}

// =============================================================================
// Page Flow
// =============================================================================

/// Vertical cursor over a growing list of pages.
struct PageFlow {
    done: Vec<Page>,
    current: Page,
    y: f32,
}

impl PageFlow {
    fn new() -> Self {
        PageFlow {
            done: Vec::new(),
            current: Page::default(),
            y: MARGIN_MM,
        }
    }

    fn fits(&self, height: f32) -> bool {
        self.y + height <= CONTENT_BOTTOM
    }

    fn break_page(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
        self.y = MARGIN_MM;
    }

    fn push(&mut self, element: Element) {
        self.current.push(element);
    }

    fn text(&mut self, x: f32, y: f32, size: f32, weight: FontWeight, align: Align, text: &str) {
        self.push(Element::Text {
            x,
            y,
            size,
            weight,
            align,
            text: text.to_string(),
        });
    }

    fn hline(&mut self, y: f32, x1: f32, x2: f32, width: f32) {
        self.push(Element::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            width,
        });
    }

    /// Bottom rule and column separators for a table row.
    fn grid_row(&mut self, top: f32, height: f32) {
        let bottom = top + height;
        self.hline(bottom, CONTENT_LEFT, CONTENT_RIGHT, GRID_WIDTH);
        for x in COLUMN_EDGES {
            self.push(Element::Line {
                x1: x,
                y1: top,
                x2: x,
                y2: bottom,
                width: GRID_WIDTH,
            });
        }
    }

    /// Closes the last page and stamps "Page i of n" on every page.
    fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        let count = self.done.len();
        for (i, page) in self.done.iter_mut().enumerate() {
            page.push(Element::Text {
                x: CENTER_X,
                y: FOOTER_Y,
                size: FOOTER_SIZE,
                weight: FontWeight::Regular,
                align: Align::Center,
                text: format!("Page {} of {}", i + 1, count),
            });
        }
        self.done
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use invoicer_core::{compute, Money, TaxRate};

    fn draft_with(items: Vec<LineItem>) -> InvoiceDraft {
        let mut draft = InvoiceDraft::new(
            1,
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            "Acme Traders\n12 Market Road",
            TaxRate::from_percentage(18.0),
        );
        draft.buyer_name = "Globex Ltd".to_string();
        draft.buyer_address = "4 Harbour Street".to_string();
        draft.items = items;
        draft
    }

    fn scenario_draft() -> InvoiceDraft {
        draft_with(vec![
            LineItem::new("Widget", 2, Money::from_cents(1000)),
            LineItem::new("Service", 1, Money::from_cents(5000)),
        ])
    }

    fn many_items(count: usize) -> Vec<LineItem> {
        (1..=count)
            .map(|i| LineItem::new(format!("Part {}", i), 1, Money::from_cents(100)))
            .collect()
    }

    fn layout(draft: &InvoiceDraft) -> InvoiceDocument {
        let totals = compute(&draft.items, draft.tax_rate);
        assemble(draft, &totals, &LayoutOptions::default())
    }

    fn lines(doc: &InvoiceDocument, page: usize) -> Vec<String> {
        doc.page_text(page)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_scenario_rows_and_totals() {
        let doc = layout(&scenario_draft());
        assert_eq!(doc.page_count(), 1);

        let lines = lines(&doc, 0);
        let has = |s: &str| lines.iter().any(|l| l == s);

        assert!(has("INVOICE"));
        assert!(has("Invoice No: 0001 Date: 2026-10-19"));
        assert!(has("Seller: Buyer:"));
        assert!(has("Acme Traders Globex Ltd"));
        assert!(has("# Description Qty Unit Price Total"));
        assert!(has("1 Widget 2 ₹10.00 ₹20.00"));
        assert!(has("2 Service 1 ₹50.00 ₹50.00"));
        assert!(has("Subtotal: ₹70.00"));
        assert!(has("Tax (18.00%): ₹12.60"));
        assert!(has("GRAND TOTAL: ₹82.60"));
        assert!(has("Thank you for your business!"));
        assert!(has("Page 1 of 1"));
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let text = layout(&scenario_draft()).page_text(0).unwrap();
        let pos = |s: &str| text.find(s).unwrap();

        assert!(pos("INVOICE") < pos("Invoice No:"));
        assert!(pos("Invoice No:") < pos("Seller:"));
        assert!(pos("Seller:") < pos("# Description"));
        assert!(pos("1 Widget") < pos("2 Service"));
        assert!(pos("2 Service") < pos("Subtotal:"));
        assert!(pos("Subtotal:") < pos("Tax (18.00%):"));
        assert!(pos("Tax (18.00%):") < pos("GRAND TOTAL:"));
        assert!(pos("GRAND TOTAL:") < pos("Thank you"));
    }

    #[test]
    fn test_grand_total_has_rule_above() {
        let doc = layout(&scenario_draft());
        let grand_total_y = doc.pages[0]
            .elements
            .iter()
            .find_map(|e| match e {
                Element::Text { y, text, .. } if text == "GRAND TOTAL:" => Some(*y),
                _ => None,
            })
            .unwrap();

        let rule_above = doc.pages[0].elements.iter().any(|e| {
            matches!(e, Element::Line { y1, y2, width, .. }
                if y1 == y2 && *width == RULE_WIDTH && *y1 < grand_total_y && grand_total_y - *y1 < TOTAL_ROW_HEIGHT)
        });
        assert!(rule_above);
    }

    #[test]
    fn test_notes_only_when_present() {
        let mut draft = scenario_draft();
        draft.notes = "   ".to_string();
        assert!(!layout(&draft).to_text().contains("Notes:"));

        draft.notes = "Payment due within 30 days".to_string();
        let text = layout(&draft).to_text();
        assert!(text.contains("Notes:\nPayment due within 30 days"));
    }

    #[test]
    fn test_long_description_wraps_inside_row() {
        let long = "Annual maintenance contract covering quarterly inspections, spare parts \
                    and emergency call-outs for all sites";
        let draft = draft_with(vec![LineItem::new(long, 1, Money::from_cents(100000))]);
        let doc = layout(&draft);

        let lines = lines(&doc, 0);
        let first = lines.iter().position(|l| l.starts_with("1 Annual")).unwrap();
        assert!(lines[first].ends_with("1 ₹1,000.00 ₹1,000.00"));
        assert!(!lines[first + 1].starts_with("Subtotal"));
    }

    #[test]
    fn test_empty_items_still_has_header_and_zero_totals() {
        let doc = layout(&draft_with(Vec::new()));
        let text = doc.page_text(0).unwrap();
        assert!(text.contains("# Description Qty Unit Price Total"));
        assert!(text.contains("GRAND TOTAL: ₹0.00"));
    }

    #[test]
    fn test_continuation_pages_repeat_header() {
        let doc = layout(&draft_with(many_items(80)));
        assert!(doc.page_count() >= 3);

        for page in 0..doc.page_count() {
            let text = doc.page_text(page).unwrap();
            assert!(text.contains("# Description Qty Unit Price Total"), "page {}", page);
            assert!(text.contains(&format!("Page {} of {}", page + 1, doc.page_count())));
        }

        assert!(doc.page_text(0).unwrap().starts_with("INVOICE"));
        assert!(!doc.page_text(1).unwrap().contains("INVOICE"));
        assert!(doc.to_text().contains("80 Part 80 1 ₹1.00 ₹1.00"));
    }

    #[test]
    fn test_totals_block_never_split() {
        for count in 15..75 {
            let doc = layout(&draft_with(many_items(count)));
            let pages_with = |label: &str| -> Vec<usize> {
                (0..doc.page_count())
                    .filter(|&p| doc.page_text(p).unwrap().contains(label))
                    .collect()
            };

            let subtotal = pages_with("Subtotal:");
            assert_eq!(subtotal.len(), 1, "{} items", count);
            assert_eq!(subtotal, pages_with("GRAND TOTAL:"), "{} items", count);
        }
    }

    fn assert_inside_margins(doc: &InvoiceDocument) {
        for page in &doc.pages {
            for element in &page.elements {
                match element {
                    Element::Text { y, text, .. } if !text.starts_with("Page ") => {
                        assert!(*y <= CONTENT_BOTTOM, "{:?} at {}", text, y);
                    }
                    Element::Fill { y, height, .. } => {
                        assert!(y + height <= CONTENT_BOTTOM, "fill at {}", y);
                    }
                    Element::Line { y1, y2, .. } => {
                        assert!(y1.max(*y2) <= CONTENT_BOTTOM, "line at {}", y1);
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_elements_stay_inside_margins() {
        let mut draft = draft_with(many_items(70));
        draft.notes = "Line one\nLine two\nLine three".to_string();
        assert_inside_margins(&layout(&draft));
    }

    #[test]
    fn test_long_parties_continue_on_next_page() {
        let mut draft = scenario_draft();
        draft.seller_info = (1..=80)
            .map(|i| format!("Seller line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        draft.buyer_address = (1..=60)
            .map(|i| format!("Buyer line {}", i))
            .collect::<Vec<_>>()
            .join("\n");

        let doc = layout(&draft);
        assert_inside_margins(&doc);
        assert!(doc.page_count() >= 2);

        let text = doc.to_text();
        assert!(text.contains("Seller line 80"));
        assert!(text.contains("Buyer line 60"));
        assert!(text.find("Seller line 80").unwrap() < text.find("# Description").unwrap());
        assert!(text.contains("GRAND TOTAL: ₹82.60"));
    }

    #[test]
    fn test_header_moves_when_parties_fill_page() {
        for lines in 40..52 {
            let mut draft = scenario_draft();
            draft.seller_info = vec!["Acme"; lines].join("\n");
            let doc = layout(&draft);
            assert_inside_margins(&doc);

            let header_page = (0..doc.page_count())
                .find(|&p| doc.page_text(p).unwrap().contains("# Description"))
                .unwrap();
            let first_row = doc.page_text(header_page).unwrap();
            assert!(first_row.contains("1 Widget 2 ₹10.00 ₹20.00"), "{} lines", lines);
        }
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let draft = scenario_draft();
        assert_eq!(layout(&draft), layout(&draft));
    }

    #[test]
    fn test_custom_currency_symbol() {
        let draft = scenario_draft();
        let totals = compute(&draft.items, draft.tax_rate);
        let options = LayoutOptions {
            currency: CurrencyFormat::new("$").unwrap(),
            ..LayoutOptions::default()
        };

        let text = assemble(&draft, &totals, &options).page_text(0).unwrap();
        assert!(text.contains("1 Widget 2 $10.00 $20.00"));
        assert!(text.contains("GRAND TOTAL: $82.60"));
    }
}
