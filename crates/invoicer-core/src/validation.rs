//! # Validation Module
//!
//! Input validation for line items and invoice metadata.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Types and required flags                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Item rules (description, quantity, unit price)                    │
//! │  ├── Tax percent (numeric, not negative)                               │
//! │  └── Draft rules before generation (seller, buyer, items)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Totals Calculator: only ever sees validated items                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Bounds
//! Quantity, price, tax and item count have no business upper limit. The
//! only ceilings are the integer types themselves: a quantity must fit an
//! `i64`, a price an `i64` of minor units, a tax rate a `u32` of basis
//! points. Totals saturate instead of overflowing.
//!
//! ## Usage
//! ```rust
//! use invoicer_core::money::CurrencyFormat;
//! use invoicer_core::validation::validate_line_item;
//!
//! let currency = CurrencyFormat::default();
//! let item = validate_line_item("Widget", "2", "10.00", &currency).unwrap();
//! assert_eq!(item.line_total().cents(), 2000);
//!
//! // Quantity 0 never reaches the totals calculator
//! assert!(validate_line_item("Widget", "0", "10.00", &currency).is_err());
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{CurrencyFormat, Money};
use crate::types::{InvoiceDraft, LineItem, TaxRate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest whole percentage a [`TaxRate`] can hold (`u32::MAX` basis points).
pub const MAX_REPRESENTABLE_TAX_PERCENT: i64 = (u32::MAX / 100) as i64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line item description.
///
/// ## Returns
/// The trimmed description; empty text is rejected.
pub fn validate_description(description: &str) -> ValidationResult<String> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::required("description"));
    }

    Ok(description.to_string())
}

/// Validates the seller and buyer blocks required on every document.
///
/// ## Example
/// ```rust
/// use invoicer_core::validation::validate_parties;
///
/// assert!(validate_parties("Acme", "Globex", "4 Harbour St").is_ok());
/// assert!(validate_parties("Acme", "  ", "4 Harbour St").is_err());
/// ```
pub fn validate_parties(
    seller_info: &str,
    buyer_name: &str,
    buyer_address: &str,
) -> ValidationResult<()> {
    if seller_info.trim().is_empty() {
        return Err(ValidationError::required("seller info"));
    }
    if buyer_name.trim().is_empty() {
        return Err(ValidationError::required("buyer name"));
    }
    if buyer_address.trim().is_empty() {
        return Err(ValidationError::required("buyer address"));
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Flow
/// ```text
/// item add --quantity 0
///       │
///       ▼
/// validate_quantity(0) ← THIS FUNCTION
///       │
///       ├── qty <= 0?  → "quantity must be positive"
///       └── OK → item appended, totals recomputed
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Parses and validates a quantity typed by the user.
pub fn parse_quantity(text: &str) -> ValidationResult<i64> {
    let qty = text
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::invalid_format("quantity", "must be a whole number"))?;
    validate_quantity(qty)?;
    Ok(qty)
}

/// Validates a unit price. Zero is allowed for free items.
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "unit price".to_string(),
        });
    }
    Ok(())
}

/// Parses and validates a unit price typed by the user.
///
/// Accepts plain decimals ("10.5") and display text in the configured
/// currency ("₹1,000.00", "$12"). Unlike [`CurrencyFormat::parse`], garbage
/// is an error here.
///
/// ## Example
/// ```rust
/// use invoicer_core::money::CurrencyFormat;
/// use invoicer_core::validation::parse_unit_price;
///
/// let rupees = CurrencyFormat::default();
/// assert_eq!(parse_unit_price("₹1,000.50", &rupees).unwrap().cents(), 100050);
/// assert!(parse_unit_price("ten", &rupees).is_err());
/// assert!(parse_unit_price("-1", &rupees).is_err());
///
/// let dollars = CurrencyFormat::new("$").unwrap();
/// assert_eq!(parse_unit_price("$10", &dollars).unwrap().cents(), 1000);
/// ```
pub fn parse_unit_price(text: &str, currency: &CurrencyFormat) -> ValidationResult<Money> {
    let price = currency.try_parse(text).ok_or_else(|| {
        ValidationError::invalid_format(
            "unit price",
            format!("must be an amount such as 10.50 or {}10.50", currency.symbol()),
        )
    })?;
    validate_unit_price(price)?;
    Ok(price)
}

/// Parses and validates a tax percentage typed by the user.
///
/// ## Rules
/// - Must be numeric ("18", "12.5", "5%")
/// - Must not be negative
/// - Must fit a [`TaxRate`]; rates above 100% are accepted
///
/// ## Example
/// ```rust
/// use invoicer_core::validation::validate_tax_percent;
///
/// assert_eq!(validate_tax_percent("18").unwrap().bps(), 1800);
/// assert_eq!(validate_tax_percent("150").unwrap().bps(), 15_000);
/// assert!(validate_tax_percent("eighteen").is_err());
/// assert!(validate_tax_percent("-1").is_err());
/// ```
pub fn validate_tax_percent(text: &str) -> ValidationResult<TaxRate> {
    if let Some(rate) = TaxRate::parse_percentage(text) {
        return Ok(rate);
    }

    let number = text.trim().trim_end_matches('%').trim();
    match Decimal::from_str(number) {
        Ok(value) if value.is_sign_negative() => Err(ValidationError::Negative {
            field: "tax percent".to_string(),
        }),
        Ok(_) => Err(ValidationError::OutOfRange {
            field: "tax percent".to_string(),
            min: 0,
            max: MAX_REPRESENTABLE_TAX_PERCENT,
        }),
        Err(_) => Err(ValidationError::invalid_format(
            "tax percent",
            "must be a number",
        )),
    }
}

/// Validates an invoice number.
pub fn validate_sequence_number(number: u32) -> ValidationResult<()> {
    if number == 0 {
        return Err(ValidationError::MustBePositive {
            field: "invoice number".to_string(),
        });
    }
    Ok(())
}

/// Parses an ISO date ("2026-10-19").
pub fn parse_date(text: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format("date", "expected YYYY-MM-DD"))
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Builds a line item from user text, validating every field.
pub fn validate_line_item(
    description: &str,
    quantity: &str,
    unit_price: &str,
    currency: &CurrencyFormat,
) -> ValidationResult<LineItem> {
    let description = validate_description(description)?;
    let quantity = parse_quantity(quantity)?;
    let unit_price = parse_unit_price(unit_price, currency)?;
    Ok(LineItem::new(description, quantity, unit_price))
}

/// Re-checks an item that came from somewhere other than user text
/// (e.g., a hand-edited draft file).
pub fn check_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_description(&item.description)?;
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price)
}

/// Validates a whole draft right before a document is generated.
///
/// An invoice with no items is allowed (it totals to zero); preview and
/// print refuse empty drafts separately.
pub fn validate_draft(draft: &InvoiceDraft) -> ValidationResult<()> {
    validate_sequence_number(draft.sequence_number)?;
    validate_parties(&draft.seller_info, &draft.buyer_name, &draft.buyer_address)?;
    draft.items.iter().try_for_each(check_line_item)
}

// =============================================================================
// Unit Tests
// =============================================================================
