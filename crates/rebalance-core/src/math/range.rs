//! # Range Math
//!
//! Basis-point arithmetic turning a reference price into position and reset
//! bounds. Widths are magnitudes, never signed offsets, and nothing is clamped:
//! a lower width of `FULL_BPS` or more yields a non-positive lower price.

use bigdecimal::BigDecimal;
use num_traits::Zero;

use crate::errors::{RebalanceError, RebalanceResult};
use crate::math::decimal::{from_bps, full_bps};
use crate::types::PositionRange;

/// `price * (FULL_BPS - lower_bps) / FULL_BPS` and
/// `price * (FULL_BPS + upper_bps) / FULL_BPS`
pub fn price_range(price: &BigDecimal, lower_bps: &BigDecimal, upper_bps: &BigDecimal) -> PositionRange {
    let full = full_bps();
    let lower_price = from_bps(&(price * (&full - lower_bps)));
    let upper_price = from_bps(&(price * (&full + upper_bps)));
    PositionRange::new(lower_price, upper_price)
}

/// Reset widths as a share of the range widths, `reset_bps * range_bps / FULL_BPS`
pub fn reset_factors(
    lower_bps: &BigDecimal,
    upper_bps: &BigDecimal,
    reset_lower_bps: &BigDecimal,
    reset_upper_bps: &BigDecimal,
) -> (BigDecimal, BigDecimal) {
    (
        from_bps(&(reset_lower_bps * lower_bps)),
        from_bps(&(reset_upper_bps * upper_bps)),
    )
}

/// Reset boundary band. The reset widths are fractions of the range widths,
/// so `reset_range(p, 1000, 1000, 5000, 5000)` sits 5% either side of `p`.
pub fn reset_range(
    price: &BigDecimal,
    lower_bps: &BigDecimal,
    upper_bps: &BigDecimal,
    reset_lower_bps: &BigDecimal,
    reset_upper_bps: &BigDecimal,
) -> PositionRange {
    let (lower_factor, upper_factor) = reset_factors(lower_bps, upper_bps, reset_lower_bps, reset_upper_bps);
    price_range(price, &lower_factor, &upper_factor)
}

/// Recover position bounds from stored reset bounds:
/// `position = reset * (FULL_BPS ∓ range_bps) / (FULL_BPS ∓ reset_factor)`.
pub fn position_range_from_reset(
    reset: &PositionRange,
    lower_bps: &BigDecimal,
    upper_bps: &BigDecimal,
    reset_lower_bps: &BigDecimal,
    reset_upper_bps: &BigDecimal,
) -> RebalanceResult<PositionRange> {
    let full = full_bps();
    let (lower_factor, upper_factor) = reset_factors(lower_bps, upper_bps, reset_lower_bps, reset_upper_bps);

    let lower_denominator = &full - &lower_factor;
    let upper_denominator = &full + &upper_factor;
    if lower_denominator.is_zero() {
        return Err(RebalanceError::DivisionByZero("lower reset inversion"));
    }
    if upper_denominator.is_zero() {
        return Err(RebalanceError::DivisionByZero("upper reset inversion"));
    }

    let lower_price = (&reset.lower_price * (&full - lower_bps)) / lower_denominator;
    let upper_price = (&reset.upper_price * (&full + upper_bps)) / upper_denominator;
    Ok(PositionRange::new(lower_price, upper_price))
}
