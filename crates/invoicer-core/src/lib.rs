//! # invoicer-core: Pure Business Logic for Invoicer
//!
//! This crate holds the invoice arithmetic and input rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Invoicer Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    invoicer CLI (apps/cli)                      │   │
//! │  │    new ──► item add/edit ──► generate ──► preview / print       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ invoicer-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ validation│  │   │
//! │  │   │ LineItem  │  │   Money   │  │ compute() │  │   rules   │  │   │
//! │  │   │  Draft    │  │ Currency  │  │ Computed  │  │  checks   │  │   │
//! │  │   │  Record   │  │  Format   │  │  Totals   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO PROCESSES • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                 │                     │
//! │  ┌──────────────▼──────────────┐   ┌──────────────▼──────────────┐     │
//! │  │ invoicer-store (CSV log)    │   │ invoicer-document (PDF)     │     │
//! │  └─────────────────────────────┘   └─────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, InvoiceDraft, InvoiceRecord, TaxRate)
//! - [`money`] - Money type and the currency formatter
//! - [`totals`] - Subtotal / tax / grand total calculation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use invoicer_core::money::{format_amount, Money};
//! use invoicer_core::totals::compute;
//! use invoicer_core::types::{LineItem, TaxRate};
//!
//! let items = vec![
//!     LineItem::new("Widget", 2, Money::from_cents(1000)),
//!     LineItem::new("Service", 1, Money::from_cents(5000)),
//! ];
//! let totals = compute(&items, TaxRate::from_percentage(18.0));
//!
//! assert_eq!(format_amount(totals.subtotal), "₹70.00");
//! assert_eq!(format_amount(totals.tax_amount), "₹12.60");
//! assert_eq!(format_amount(totals.grand_total), "₹82.60");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyFormat, Money};
pub use totals::{compute, ComputedTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Tax percentage a fresh draft starts with.
pub const DEFAULT_TAX_PERCENT: f64 = 18.0;

