//! Money Helpers
//!
//! Conversions between the wire's "X.YY" major-unit strings and the minor
//! units the payment provider wants. Decimal math only.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Parse a major-unit amount string ("25.00", "25", "25.5") into minor
/// units. Rounds sub-cent precision half-up, like the original relay's
/// `toFixed(2)`. Returns `None` for unparseable or negative input.
pub fn parse_major(amount: &str) -> Option<i64> {
    let value: Decimal = amount.trim().parse().ok()?;
    if value.is_sign_negative() {
        return None;
    }
    let minor = (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    minor.to_i64()
}

/// Format minor units as a "X.YY" major-unit string.
pub fn format_minor(minor: i64) -> String {
    Decimal::new(minor, 2).to_string()
}
