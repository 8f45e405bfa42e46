//! Money rounding and formatting
//!
//! Every amount shown to a user or a model goes through here so the whole
//! system agrees on one convention: 2 decimal places, half-up.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for monetary amounts
pub const MONEY_SCALE: u32 = 2;

/// Round to 2 decimal places, half-up (away from zero on a tie)
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Render an amount with exactly 2 decimal places, e.g. `1234.50`
pub fn format_amount(amount: Decimal) -> String {
    round_money(amount).to_string()
}

/// Percentage change from `previous` to `current`, rounded to 1 decimal place
///
/// The ratio is first rounded to 4 places, then scaled to a percentage and
/// rounded again, both half-up. A zero `previous` yields zero.
pub fn percentage_change(previous: Decimal, current: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }

    let ratio = ((current - previous) / previous)
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    let mut percent = (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    percent.rescale(1);
    percent
}

/// Render a percentage change: `+50.0%`, `-12.5%`, or `0%`
pub fn format_percentage(percent: Decimal) -> String {
    if percent.is_zero() {
        "0%".to_string()
    } else if percent.is_sign_positive() {
        format!("+{}%", percent)
    } else {
        format!("{}%", percent)
    }
}
