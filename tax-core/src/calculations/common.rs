//! Small numeric helpers shared by the calculation steps.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to cents using half-up rounding.
///
/// Values at exactly half a cent round away from zero, the usual
/// convention for presenting money.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(5215.884)), dec!(5215.88));
/// assert_eq!(round_half_up(dec!(5215.885)), dec!(5215.89));
/// assert_eq!(round_half_up(dec!(-12.345)), dec!(-12.35));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-250.00)), Decimal::ZERO);
/// assert_eq!(floor_at_zero(dec!(250.00)), dec!(250.00));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Converts a whole-number percent into a multiplier (`22` becomes `0.22`).
pub fn percent(rate: i32) -> Decimal {
    Decimal::from(rate) / Decimal::ONE_HUNDRED
}
