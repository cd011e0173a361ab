//! # Font Metrics
//!
//! Glyph widths for the two standard fonts the document uses, WinAnsi
//! encoding, and word wrapping.
//!
//! ## Why Measure Here?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Right-aligned amounts and centered quantities need the width of the   │
//! │  text before it is placed. Helvetica is one of the PDF standard 14     │
//! │  fonts, so the viewer supplies the glyphs and we only need the AFM     │
//! │  advance widths (1/1000 em) to position them.                          │
//! │                                                                         │
//! │  "₹10.00" ──encode──► b"Rs.10.00" ──widths──► 3946 units              │
//! │                                         × 10pt / 1000 = 39.46pt        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::layout::FontWeight;

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Width used for encoded bytes outside the ASCII tables.
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica advance widths for bytes 32..=126.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for bytes 32..=126.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// =============================================================================
// Encoding
// =============================================================================

/// Encodes text as WinAnsi bytes for a standard-font PDF string.
///
/// Latin-1 maps straight through. A few common typographic characters use
/// their WinAnsi slots. The rupee sign becomes `Rs.`; anything else
/// becomes `?`. Control characters are dropped.
///
/// ```rust
/// use invoicer_document::metrics::encode_win_ansi;
///
/// assert_eq!(encode_win_ansi("₹1,234.50"), b"Rs.1,234.50".to_vec());
/// assert_eq!(encode_win_ansi("Café"), vec![b'C', b'a', b'f', 0xE9]);
/// ```
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '₹' => out.extend_from_slice(b"Rs."),
            '\t' => out.push(b' '),
            c if c.is_control() => {}
            c if (c as u32) < 0x80 => out.push(c as u8),
            c if (0xA0..=0xFF).contains(&(c as u32)) => out.push(c as u32 as u8),
            '€' => out.push(0x80),
            '…' => out.push(0x85),
            '‘' => out.push(0x91),
            '’' => out.push(0x92),
            '“' => out.push(0x93),
            '”' => out.push(0x94),
            '•' => out.push(0x95),
            '–' => out.push(0x96),
            '—' => out.push(0x97),
            '™' => out.push(0x99),
            _ => out.push(b'?'),
        }
    }
    out
}

// =============================================================================
// Measurement
// =============================================================================

fn byte_width(byte: u8, weight: FontWeight) -> u16 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    };
    match byte {
        32..=126 => table[(byte - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of text in points once encoded.
pub fn text_width_pt(text: &str, weight: FontWeight, size: f32) -> f32 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|b| byte_width(b, weight) as u32)
        .sum();
    units as f32 * size / 1000.0
}

/// Width of text in millimetres once encoded.
pub fn text_width_mm(text: &str, weight: FontWeight, size: f32) -> f32 {
    text_width_pt(text, weight, size) / PT_PER_MM
}

// =============================================================================
// Wrapping
// =============================================================================

/// Wraps text into lines no wider than `max_width_mm`.
///
/// Explicit newlines are kept. Words are split on whitespace; a single word
/// wider than the line is broken between characters. Blank input gives one
/// empty line so every cell keeps its height.
pub fn wrap_text(text: &str, weight: FontWeight, size: f32, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width_mm(&candidate, weight, size) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width_mm(word, weight, size) <= max_width_mm {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, weight, size, max_width_mm);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn break_word(word: &str, weight: FontWeight, size: f32, max_width_mm: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1 && text_width_mm(&current, weight, size) > max_width_mm {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    pieces.push(current);
    pieces
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        // "Total" in Helvetica: T611 o556 t278 a556 l222 = 2223
        let w = text_width_pt("Total", FontWeight::Regular, 10.0);
        assert!((w - 22.23).abs() < 0.001);

        // Bold digits are as wide as regular ones
        assert_eq!(
            text_width_pt("0123", FontWeight::Bold, 10.0),
            text_width_pt("0123", FontWeight::Regular, 10.0)
        );
    }

    #[test]
    fn test_rupee_measures_as_transliteration() {
        assert_eq!(
            text_width_pt("₹10.00", FontWeight::Regular, 10.0),
            text_width_pt("Rs.10.00", FontWeight::Regular, 10.0)
        );
    }

    #[test]
    fn test_encode_replaces_unknown_and_drops_controls() {
        assert_eq!(encode_win_ansi("a\u{7}b"), b"ab".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
        assert_eq!(encode_win_ansi("€5"), vec![0x80, b'5']);
    }

    #[test]
    fn test_wrap_keeps_short_text_on_one_line() {
        let lines = wrap_text("Widget", FontWeight::Regular, 10.0, 76.0);
        assert_eq!(lines, vec!["Widget".to_string()]);
    }

    #[test]
    fn test_wrap_splits_long_description() {
        let text = "Annual maintenance contract covering quarterly inspections, \
                    spare parts and emergency call-outs";
        let lines = wrap_text(text, FontWeight::Regular, 10.0, 76.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, FontWeight::Regular, 10.0) <= 76.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_breaks_oversized_word() {
        let word = "X".repeat(60);
        let lines = wrap_text(&word, FontWeight::Bold, 10.0, 40.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_keeps_explicit_newlines() {
        let lines = wrap_text("Acme\n12 Market Road", FontWeight::Regular, 10.0, 80.0);
        assert_eq!(lines, vec!["Acme".to_string(), "12 Market Road".to_string()]);
    }

    #[test]
    fn test_wrap_blank_is_one_empty_line() {
        assert_eq!(
            wrap_text("", FontWeight::Regular, 10.0, 80.0),
            vec![String::new()]
        );
    }
}
