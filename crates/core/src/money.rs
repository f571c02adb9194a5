//! Monetary values and their CSV rendering.
//!
//! Prices are carried as [`Decimal`] end-to-end; only the final rendering
//! depends on the store's configured precision.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default number of decimals when the store does not configure one.
pub const DEFAULT_PRICE_DECIMALS: u32 = 2;

/// Largest scale a [`Decimal`] can carry.
pub const MAX_PRICE_DECIMALS: u32 = Decimal::MAX_SCALE;

/// Fixed-point, non-grouped price formatting (`1234.50`, never `1,234.50`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFormat {
    decimals: u32,
}

impl PriceFormat {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Render `value` rounded half away from zero to the configured precision.
    pub fn format(&self, value: Decimal) -> String {
        let mut rounded =
            value.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        format!("{:.*}", self.decimals as usize, rounded)
    }

    /// The formatted zero value (`0.00` at two decimals).
    pub fn zero(&self) -> String {
        self.format(Decimal::ZERO)
    }
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_DECIMALS)
    }
}

/// Lenient numeric coercion for price/weight fields stored as free text.
///
/// Empty or non-numeric input yields `None`; a numeric prefix (`"12.5kg"`)
/// is honoured the way loosely-typed storage layers do.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = Decimal::from_str(trimmed) {
        return Some(value);
    }
    if let Ok(value) = Decimal::from_scientific(trimmed) {
        return Some(value);
    }

    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        let ok = ch.is_ascii_digit()
            || (idx == 0 && (ch == '-' || ch == '+'))
            || (ch == '.' && !seen_dot);
        if !ok {
            break;
        }
        if ch == '.' {
            seen_dot = true;
        }
        end = idx + ch.len_utf8();
    }

    Decimal::from_str(trimmed[..end].trim_end_matches('.')).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn formats_with_configured_precision() {
        assert_eq!(PriceFormat::new(2).format(dec("10")), "10.00");
        assert_eq!(PriceFormat::new(0).format(dec("10.5")), "11");
        assert_eq!(PriceFormat::new(3).format(dec("1.2")), "1.200");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(PriceFormat::new(2).format(dec("2.345")), "2.35");
        assert_eq!(PriceFormat::new(2).format(dec("-2.345")), "-2.35");
    }

    #[test]
    fn never_groups_thousands() {
        assert_eq!(PriceFormat::default().format(dec("1234567.891")), "1234567.89");
    }

    #[test]
    fn negative_zero_renders_as_zero() {
        assert_eq!(PriceFormat::default().format(dec("-0.001")), "0.00");
    }

    #[test]
    fn parse_amount_is_lenient() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("  "), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("12.50"), Some(dec("12.50")));
        assert_eq!(parse_amount("12.5kg"), Some(dec("12.5")));
        assert_eq!(parse_amount("1e3"), Decimal::from_f64(1000.0));
    }
}
