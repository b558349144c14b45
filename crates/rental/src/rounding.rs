//! Markup and rounding math.
//!
//! Pure functions, no catalog access. Every operation is checked; `None` means
//! the result does not fit in a `Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round `value` to the nearest multiple of `precision`.
///
/// Halfway cases round away from zero, so a price never drops because of a
/// tie. A precision of zero (or below) yields zero: there is no multiple to
/// snap to.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use rentprice_rental::round_to_precision;
///
/// assert_eq!(round_to_precision(dec!(21.989), dec!(1)), Some(dec!(22)));
/// assert_eq!(round_to_precision(dec!(10.37), dec!(0.05)), Some(dec!(10.35)));
/// assert_eq!(round_to_precision(dec!(12.5), dec!(5)), Some(dec!(15)));
/// assert_eq!(round_to_precision(dec!(12.5), dec!(0)), Some(dec!(0)));
/// ```
pub fn round_to_precision(value: Decimal, precision: Decimal) -> Option<Decimal> {
    if precision <= Decimal::ZERO || value.is_zero() {
        return Some(Decimal::ZERO);
    }
    let steps = value
        .checked_div(precision)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Some(steps.checked_mul(precision)?.normalize())
}

/// Multiplier for a percentage markup: `1 + percentage / 100`.
pub fn markup_factor(percentage: Decimal) -> Option<Decimal> {
    Decimal::ONE.checked_add(percentage.checked_div(Decimal::ONE_HUNDRED)?)
}

/// New price for `actual` after applying `percentage` and rounding to `precision`.
pub fn reprice(actual: Decimal, percentage: Decimal, precision: Decimal) -> Option<Decimal> {
    let marked_up = actual.checked_mul(markup_factor(percentage)?)?;
    round_to_precision(marked_up, precision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ten_percent_on_19_99_rounds_to_22() {
        assert_eq!(reprice(dec!(19.99), dec!(10), dec!(1)), Some(dec!(22)));
    }

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(round_to_precision(dec!(2.5), dec!(1)), Some(dec!(3)));
        assert_eq!(round_to_precision(dec!(3.5), dec!(1)), Some(dec!(4)));
        assert_eq!(round_to_precision(dec!(-2.5), dec!(1)), Some(dec!(-3)));
        assert_eq!(round_to_precision(dec!(1.125), dec!(0.25)), Some(dec!(1.25)));
    }

    #[test]
    fn fractional_precision_snaps_to_multiples() {
        assert_eq!(round_to_precision(dec!(10.37), dec!(0.05)), Some(dec!(10.35)));
        assert_eq!(round_to_precision(dec!(10.38), dec!(0.05)), Some(dec!(10.40)));
        assert_eq!(round_to_precision(dec!(1.234), dec!(0.01)), Some(dec!(1.23)));
    }

    #[test]
    fn coarse_precision() {
        assert_eq!(round_to_precision(dec!(147), dec!(10)), Some(dec!(150)));
        assert_eq!(round_to_precision(dec!(144.99), dec!(10)), Some(dec!(140)));
    }

    #[test]
    fn zero_precision_yields_zero() {
        assert_eq!(round_to_precision(dec!(21.989), dec!(0)), Some(Decimal::ZERO));
        assert_eq!(reprice(dec!(19.99), dec!(10), dec!(0)), Some(Decimal::ZERO));
    }

    #[test]
    fn markup_factor_handles_discounts() {
        assert_eq!(markup_factor(dec!(0)), Some(dec!(1)));
        assert_eq!(markup_factor(dec!(25)), Some(dec!(1.25)));
        assert_eq!(markup_factor(dec!(-20)), Some(dec!(0.8)));
        assert_eq!(reprice(dec!(100), dec!(-100), dec!(1)), Some(dec!(0)));
    }

    #[test]
    fn tiny_precision_overflow_is_reported() {
        let result = reprice(dec!(1000000000), dec!(10), dec!(0.00000000000000000001));
        assert_eq!(result, None);
    }

    #[test]
    fn huge_percentage_overflow_is_reported() {
        assert_eq!(reprice(dec!(1000), Decimal::MAX, dec!(1)), None);
    }
}
