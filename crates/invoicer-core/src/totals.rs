//! # Totals Calculator
//!
//! Derives subtotal, tax and grand total from a list of line items.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► Σ (quantity × unit_price) ──────────────► subtotal           │
//! │                                                        │                │
//! │  tax_rate ───────────────────► subtotal × bps / 10000 ─┴► tax_amount    │
//! │                                  (half up, minor unit)                  │
//! │                                                                         │
//! │  subtotal + tax_amount ─────────────────────────────► grand_total       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are never stored on their own: the shell recomputes them after
//! every item edit and once more right before a document is generated.

use serde::{Deserialize, Serialize};

use crate::money::{self, Money};
use crate::types::{LineItem, TaxRate};

/// Values derived from a draft's items and tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComputedTotals {
    #[serde(with = "money::plain")]
    pub subtotal: Money,

    #[serde(with = "money::plain")]
    pub tax_amount: Money,

    #[serde(with = "money::plain")]
    pub grand_total: Money,
}

/// Computes invoice totals.
///
/// The sum is taken in encounter order, though order does not change it.
/// An empty item list yields all zeros; a zero rate yields no tax.
///
/// ## Example
/// ```rust
/// use invoicer_core::money::Money;
/// use invoicer_core::totals::compute;
/// use invoicer_core::types::{LineItem, TaxRate};
///
/// let totals = compute(&[], TaxRate::from_percentage(18.0));
/// assert!(totals.grand_total.is_zero());
///
/// let items = [LineItem::new("Widget", 2, Money::from_cents(1000))];
/// let totals = compute(&items, TaxRate::zero());
/// assert_eq!(totals.grand_total, totals.subtotal);
/// ```
pub fn compute(items: &[LineItem], tax_rate: TaxRate) -> ComputedTotals {
    let subtotal: Money = items.iter().map(LineItem::line_total).sum();
    let tax_amount = subtotal.calculate_tax(tax_rate);

    ComputedTotals {
        subtotal,
        tax_amount,
        grand_total: subtotal.saturating_add(tax_amount),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
