//! # Money Module
//!
//! Provides the `Money` type and the currency formatter.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    70.00 × 18 / 100 = 12.600000000000001  ❌ WRONG!                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise / cents)                      │
//! │    7000 × 1800 bps / 10000 = 1260  → ₹12.60                             │
//! │                                                                         │
//! │  Decimals only exist at the text boundary (parse / format).             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Currency Formatter
//! ```text
//!   Money(123456)  ──format──►  "₹1,234.56"
//!   "₹1,234.56"    ──parse───►  Money(123456)
//!   "garbage"      ──parse───►  Money(0)          (fallback, never an error)
//! ```
//!
//! ## Usage
//! ```rust
//! use invoicer_core::money::{format_amount, CurrencyFormat, Money};
//!
//! let price = Money::from_cents(1099);
//! assert_eq!(format_amount(price), "₹10.99");
//!
//! let rupees = CurrencyFormat::default();
//! assert_eq!(rupees.parse("₹10.99"), price);
//! assert_eq!(rupees.parse("ten rupees"), Money::zero());
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::TaxRate;
use crate::DEFAULT_CURRENCY_SYMBOL;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values only appear in formatting round-trips
///   and corrections; invoices themselves are non-negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price ──► line_total (× quantity) ──► subtotal
///                                                        │
///                              tax_amount ◄── TaxRate ◄──┤
///                                                        ▼
///                                                   grand_total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // ₹10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a plain decimal string ("70", "70.5", "-12.345").
    ///
    /// Values with more than two fraction digits are rounded half away from
    /// zero. Returns `None` for anything that is not a plain decimal or does
    /// not fit in an `i64` of minor units.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal_str("12.6"), Some(Money::from_cents(1260)));
    /// assert_eq!(Money::from_decimal_str("0.005"), Some(Money::from_cents(1)));
    /// assert_eq!(Money::from_decimal_str("₹5"), None);
    /// ```
    pub fn from_decimal_str(text: &str) -> Option<Money> {
        let value = Decimal::from_str(text.trim()).ok()?;
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::ONE_HUNDRED)?
            .to_i64()
            .map(Money)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion, truncated toward zero.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half up to the minor unit.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::Money;
    /// use invoicer_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(7000);  // ₹70.00
    /// let rate = TaxRate::from_bps(1800);      // 18%
    /// assert_eq!(subtotal.calculate_tax(rate).cents(), 1260);
    ///
    /// // ₹10.00 × 8.25% = ₹0.825 → ₹0.83
    /// let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
    /// assert_eq!(tax.cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity (saturating at the i64 bounds).
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000); // ₹10.00
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 2000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Adds two amounts, saturating at the i64 bounds.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Plain decimal representation without symbol or grouping ("1234.50").
    ///
    /// This is the form written to the record log.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().unsigned_abs(), self.minor_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the default currency format ("₹1,234.56").
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(*self))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

// =============================================================================
// Currency Formatter
// =============================================================================

/// Display format for amounts: symbol, thousands separators, two decimals.
///
/// ## Format
/// ```text
///   1234.5    →  ₹1,234.50
///   -5.5      →  -₹5.50
///   0         →  ₹0.00
/// ```
///
/// The symbol must not contain digits, `,` or `-`; those characters would be
/// ambiguous when parsing the formatted text back. Parsing strips the symbol
/// only where `format` puts it, so symbols such as `Rs.` leave the decimal
/// point alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    symbol: String,
}

impl CurrencyFormat {
    /// Creates a formatter for the given symbol.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::{CurrencyFormat, Money};
    ///
    /// let usd = CurrencyFormat::new("$").unwrap();
    /// assert_eq!(usd.format(Money::from_cents(123456)), "$1,234.56");
    /// assert!(CurrencyFormat::new("R1").is_err());
    /// ```
    pub fn new(symbol: impl Into<String>) -> Result<Self, ValidationError> {
        let symbol = symbol.into();
        if symbol
            .chars()
            .any(|c| c.is_ascii_digit() || c == ',' || c == '-')
        {
            return Err(ValidationError::InvalidFormat {
                field: "currency_symbol".to_string(),
                reason: "must not contain digits, ',' or '-'".to_string(),
            });
        }
        Ok(CurrencyFormat { symbol })
    }

    /// Returns the currency symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Formats an amount. Never fails.
    pub fn format(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.symbol,
            group_thousands(amount.major().unsigned_abs()),
            amount.minor_part()
        )
    }

    /// Formats a textual amount, treating unparseable text as zero.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::CurrencyFormat;
    ///
    /// let fmt = CurrencyFormat::default();
    /// assert_eq!(fmt.format_text("1234.5"), "₹1,234.50");
    /// assert_eq!(fmt.format_text("n/a"), "₹0.00");
    /// ```
    pub fn format_text(&self, text: &str) -> String {
        self.format(self.parse(text))
    }

    /// Parses display text back into an amount.
    ///
    /// Any failure yields zero; the caller never sees an error.
    pub fn parse(&self, text: &str) -> Money {
        self.try_parse(text).unwrap_or_default()
    }

    /// Strict form of [`CurrencyFormat::parse`].
    ///
    /// Accepts `[-][symbol]digits` with optional thousands separators and
    /// whitespace, plus `[symbol]-digits` as older records wrote it. Returns
    /// `None` for anything else, including amounts that do not fit.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::CurrencyFormat;
    ///
    /// let fmt = CurrencyFormat::new("$").unwrap();
    /// assert_eq!(fmt.try_parse("-$1,000.5").map(|m| m.cents()), Some(-100050));
    /// assert_eq!(fmt.try_parse("12"), fmt.try_parse("$12"));
    /// assert_eq!(fmt.try_parse("ten"), None);
    /// ```
    pub fn try_parse(&self, text: &str) -> Option<Money> {
        let text = text.trim();
        let (sign, rest) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest.trim_start()),
            None => ("", text),
        };
        let digits = rest.strip_prefix(self.symbol.as_str()).unwrap_or(rest);

        let mut cleaned = String::with_capacity(digits.len() + 1);
        cleaned.push_str(sign);
        cleaned.extend(digits.chars().filter(|c| *c != ',' && !c.is_whitespace()));

        Money::from_decimal_str(&cleaned)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// Formats with the default symbol.
pub fn format_amount(amount: Money) -> String {
    CurrencyFormat::default().format(amount)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Serde helper
// =============================================================================

/// Serializes `Money` as a plain decimal string ("70.00").
///
/// Used by the record log and the draft file so both stay human-readable.
/// Deserialization is strict: a malformed amount is an error, not zero.
pub mod plain {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_decimal_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let text = String::deserialize(deserializer)?;
        Money::from_decimal_str(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid amount: {:?}", text)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_cents(500).to_string(), "₹5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-₹5.50");
        assert_eq!(Money::from_cents(0).to_string(), "₹0.00");
    }

    #[test]
    fn test_format_thousands_separators() {
        assert_eq!(format_amount(Money::from_cents(123456)), "₹1,234.56");
        assert_eq!(format_amount(Money::from_cents(100000000)), "₹1,000,000.00");
        assert_eq!(format_amount(Money::from_cents(99999)), "₹999.99");
        assert_eq!(format_amount(Money::from_cents(-123456789)), "-₹1,234,567.89");
    }

    #[test]
    fn test_parse_strips_symbol_and_separators() {
        assert_eq!(CurrencyFormat::default().parse("₹1,234.56").cents(), 123456);
        assert_eq!(CurrencyFormat::default().parse("  ₹ 50 ").cents(), 5000);
        assert_eq!(CurrencyFormat::default().parse("-₹5.50").cents(), -550);
        // Older records put the sign after the symbol
        assert_eq!(CurrencyFormat::default().parse("₹-5.50").cents(), -550);
        assert_eq!(CurrencyFormat::default().parse("12.6").cents(), 1260);
    }

    #[test]
    fn test_parse_falls_back_to_zero() {
        assert_eq!(CurrencyFormat::default().parse(""), Money::zero());
        assert_eq!(CurrencyFormat::default().parse("abc"), Money::zero());
        assert_eq!(CurrencyFormat::default().parse("₹"), Money::zero());
        assert_eq!(CurrencyFormat::default().parse("1.2.3"), Money::zero());
        assert_eq!(CurrencyFormat::default().parse("99999999999999999999999999"), Money::zero());
    }

    #[test]
    fn test_format_text_unparseable_is_zero() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format_text("not a number"), "₹0.00");
        assert_eq!(fmt.format_text("₹1,000"), "₹1,000.00");
    }

    #[test]
    fn test_custom_symbol() {
        let fmt = CurrencyFormat::new("Rs.").unwrap();
        assert_eq!(fmt.format(Money::from_cents(250075)), "Rs.2,500.75");
        assert_eq!(fmt.parse("Rs.2,500.75").cents(), 250075);
        assert_eq!(fmt.parse("2,500.75").cents(), 250075);
    }

    #[test]
    fn test_try_parse_is_strict() {
        let fmt = CurrencyFormat::new("$").unwrap();
        assert_eq!(fmt.try_parse("$10").map(|m| m.cents()), Some(1000));
        assert_eq!(fmt.try_parse("-$5.50").map(|m| m.cents()), Some(-550));
        assert_eq!(fmt.try_parse("$-5.50").map(|m| m.cents()), Some(-550));
        assert_eq!(fmt.try_parse(" $ 1,000 ").map(|m| m.cents()), Some(100000));
        assert_eq!(fmt.try_parse("₹10"), None);
        assert_eq!(fmt.try_parse("$"), None);
        assert_eq!(fmt.try_parse("10$"), None);
    }

    #[test]
    fn test_dot_symbol_keeps_decimal_point() {
        let fmt = CurrencyFormat::new(".").unwrap();
        let amount = Money::from_cents(150);
        assert_eq!(fmt.format(amount), ".1.50");
        assert_eq!(fmt.parse(".1.50"), amount);
        assert_eq!(fmt.parse("1.50"), amount);
        assert_eq!(fmt.format_text("1.50"), ".1.50");
    }

    #[test]
    fn test_symbol_rules() {
        assert!(CurrencyFormat::new("$").is_ok());
        assert!(CurrencyFormat::new("").is_ok());
        assert!(CurrencyFormat::new("1$").is_err());
        assert!(CurrencyFormat::new("-").is_err());
        assert!(CurrencyFormat::new(",").is_err());
    }

    #[test]
    fn test_from_decimal_str_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal_str("0.005").unwrap().cents(), 1);
        assert_eq!(Money::from_decimal_str("0.004").unwrap().cents(), 0);
        assert_eq!(Money::from_decimal_str("-0.005").unwrap().cents(), -1);
        assert_eq!(Money::from_decimal_str("70").unwrap().cents(), 7000);
        assert!(Money::from_decimal_str("seventy").is_none());
    }

    #[test]
    fn test_to_decimal_string() {
        assert_eq!(Money::from_cents(7000).to_decimal_string(), "70.00");
        assert_eq!(Money::from_cents(1260).to_decimal_string(), "12.60");
        assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
        assert_eq!(Money::from_cents(123456789).to_decimal_string(), "1234567.89");
    }

    #[test]
    fn test_saturating_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.saturating_add(b).cents(), 1500);
        assert_eq!(a.multiply_quantity(3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);

        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.saturating_add(a).cents(), i64::MAX);
        let overflowing: Money = vec![max, max].into_iter().sum();
        assert_eq!(overflowing.cents(), i64::MAX);
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(3).cents(), i64::MAX);
    }

    #[test]
    fn test_tax_calculation_basic() {
        let amount = Money::from_cents(1000);
        let tax = amount.calculate_tax(TaxRate::from_bps(1000)); // 10%
        assert_eq!(tax.cents(), 100);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // ₹10.00 at 8.25% = ₹0.825 → ₹0.83 (half up)
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(-100).is_negative());
        assert!(!Money::from_cents(100).is_negative());
    }

    #[test]
    fn test_plain_serde_helper() {
        #[derive(Serialize, Deserialize)]
        struct Row {
            #[serde(with = "plain")]
            amount: Money,
        }

        let json = serde_json::to_string(&Row { amount: Money::from_cents(1260) }).unwrap();
        assert_eq!(json, r#"{"amount":"12.60"}"#);

        let row: Row = serde_json::from_str(r#"{"amount":"12.6"}"#).unwrap();
        assert_eq!(row.amount.cents(), 1260);

        assert!(serde_json::from_str::<Row>(r#"{"amount":"twelve"}"#).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn format_then_parse_round_trips(cents in -1_000_000_000_000_000i64..1_000_000_000_000_000i64) {
            let amount = Money::from_cents(cents);
            assert_eq!(CurrencyFormat::default().parse(&format_amount(amount)), amount);
        }

        #[test]
        fn round_trip_holds_for_other_symbols(
            cents in 0i64..10_000_000_000i64,
            symbol in prop::sample::select(vec!["$", "Rs.", "€", "", "CHF ", "."]),
        ) {
            let fmt = CurrencyFormat::new(symbol).unwrap();
            let amount = Money::from_cents(cents);
            assert_eq!(fmt.parse(&fmt.format(amount)), amount);
        }

        #[test]
        fn formatted_amount_has_two_fraction_digits(cents in any::<i32>()) {
            let text = format_amount(Money::from_cents(cents as i64));
            let fraction = text.rsplit('.').next().unwrap();
            assert_eq!(fraction.len(), 2);
            assert!(fraction.chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn plain_decimal_round_trips(cents in any::<i64>()) {
            let amount = Money::from_cents(cents);
            assert_eq!(Money::from_decimal_str(&amount.to_decimal_string()), Some(amount));
        }
    }
}
