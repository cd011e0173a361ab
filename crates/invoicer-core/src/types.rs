//! # Domain Types
//!
//! Core domain types used throughout Invoicer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌──────────────────┐     │
//! │  │  InvoiceDraft   │   │    LineItem      │   │  InvoiceRecord   │     │
//! │  │  ─────────────  │   │  ─────────────   │   │  ─────────────   │     │
//! │  │  sequence_number│──►│  description     │   │  sequence_number │     │
//! │  │  date           │   │  quantity        │   │  date, buyer     │     │
//! │  │  seller / buyer │   │  unit_price      │   │  subtotal, tax   │     │
//! │  │  items, tax     │   └──────────────────┘   │  total           │     │
//! │  │  notes          │──── generate ──────────► └──────────────────┘     │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    TaxRate      │   bps (u32): 1800 = 18.00%                         │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! A draft is owned by the session and mutated freely. Only after a document
//! has been written does an `InvoiceRecord` snapshot of it reach the log.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::money::{self, Money};
use crate::totals::ComputedTotals;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (standard GST slab)
///
/// ## Fallback Policy
/// A tax rate is never negative. Constructors that take a percentage map
/// negative, NaN, infinite or unparseable input to zero instead of failing.
/// Strict checking of user input lives in [`crate::validation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (18.0 → 1800 bps).
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_percentage(18.0).bps(), 1800);
    /// assert_eq!(TaxRate::from_percentage(-5.0), TaxRate::zero());
    /// assert_eq!(TaxRate::from_percentage(f64::NAN), TaxRate::zero());
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate::zero();
        }
        let bps = (pct * 100.0).round();
        if bps >= u32::MAX as f64 {
            TaxRate(u32::MAX)
        } else {
            TaxRate(bps as u32)
        }
    }

    /// Parses a percentage exactly ("18", "12.5"), rounding to whole bps.
    ///
    /// Returns `None` for text that is not a plain decimal. Negative values
    /// also return `None`; use [`TaxRate::parse_or_zero`] for the lenient form.
    pub fn parse_percentage(text: &str) -> Option<TaxRate> {
        let pct = Decimal::from_str(text.trim().trim_end_matches('%').trim()).ok()?;
        if pct.is_sign_negative() && !pct.is_zero() {
            return None;
        }
        let bps = pct
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()?;
        Some(TaxRate(bps))
    }

    /// Lenient form of [`TaxRate::parse_percentage`]: anything invalid is zero.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::parse_or_zero("18").bps(), 1800);
    /// assert_eq!(TaxRate::parse_or_zero("eighteen"), TaxRate::zero());
    /// assert_eq!(TaxRate::parse_or_zero("-3"), TaxRate::zero());
    /// ```
    pub fn parse_or_zero(text: &str) -> TaxRate {
        TaxRate::parse_percentage(text).unwrap_or_default()
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Percentage with exactly two decimals ("18.00"), no float rounding.
    pub fn display_percent(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One billable row on an invoice.
///
/// Constructing a `LineItem` directly does not validate it; the shell builds
/// items through [`crate::validation::validate_line_item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// What is being billed. Non-empty.
    pub description: String,

    /// How many units. Positive.
    pub quantity: i64,

    /// Price per unit. Non-negative.
    #[serde(with = "money::plain")]
    pub unit_price: Money,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Quantity × unit price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// The invoice being edited in the current session.
///
/// ## Ownership
/// Exclusively owned by the session. Nothing about a draft is written to
/// the record log until a document has been generated from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// Invoice number, printed zero-padded ("0007").
    pub sequence_number: u32,

    /// Invoice date.
    pub date: NaiveDate,

    /// Multi-line seller block (name, address, contact lines).
    pub seller_info: String,

    pub buyer_name: String,

    pub buyer_address: String,

    /// Line items in display order.
    #[serde(default)]
    pub items: Vec<LineItem>,

    pub tax_rate: TaxRate,

    #[serde(default)]
    pub notes: String,
}

impl InvoiceDraft {
    /// Creates an empty draft.
    pub fn new(
        sequence_number: u32,
        date: NaiveDate,
        seller_info: impl Into<String>,
        tax_rate: TaxRate,
    ) -> Self {
        InvoiceDraft {
            sequence_number,
            date,
            seller_info: seller_info.into(),
            buyer_name: String::new(),
            buyer_address: String::new(),
            items: Vec::new(),
            tax_rate,
            notes: String::new(),
        }
    }

    /// Zero-padded invoice number as printed on documents ("0042").
    pub fn number_label(&self) -> String {
        format_sequence_number(self.sequence_number)
    }

    /// Buyer block as printed: name on the first line, address below.
    pub fn buyer_info(&self) -> String {
        let name = self.buyer_name.trim();
        let address = self.buyer_address.trim();
        match (name.is_empty(), address.is_empty()) {
            (false, false) => format!("{}\n{}", name, address),
            (false, true) => name.to_string(),
            (true, _) => address.to_string(),
        }
    }

    /// Snapshot written to the record log after a successful generation.
    pub fn to_record(&self, totals: &ComputedTotals) -> InvoiceRecord {
        InvoiceRecord {
            sequence_number: self.sequence_number,
            date: self.date,
            buyer: self.buyer_name.trim().to_string(),
            subtotal: totals.subtotal,
            tax: totals.tax_amount,
            total: totals.grand_total,
        }
    }
}

/// Zero-pads a sequence number to four digits.
///
/// ```rust
/// use invoicer_core::types::format_sequence_number;
///
/// assert_eq!(format_sequence_number(7), "0007");
/// assert_eq!(format_sequence_number(12345), "12345");
/// ```
pub fn format_sequence_number(number: u32) -> String {
    format!("{:04}", number)
}

// =============================================================================
// Invoice Record
// =============================================================================

/// One row of the append-only record log.
///
/// Field names match the log header `invoice_no,date,buyer,subtotal,tax,total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(rename = "invoice_no")]
    pub sequence_number: u32,

    pub date: NaiveDate,

    pub buyer: String,

    #[serde(with = "money::plain")]
    pub subtotal: Money,

    #[serde(with = "money::plain")]
    pub tax: Money,

    #[serde(with = "money::plain")]
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
