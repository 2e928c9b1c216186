//! Decimal helpers on top of `BigDecimal`.
//!
//! Scaling by powers of ten and by `2^-64` is exact; only integer powers of a
//! non-trivial base are cut to [`PRICE_PRECISION`] significant digits.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};

use crate::constants::{FULL_BPS, PRICE_PRECISION};
use crate::errors::{RebalanceError, RebalanceResult};

/// Integer as a decimal with scale 0
pub fn integer(value: impl Into<BigInt>) -> BigDecimal {
    BigDecimal::new(value.into(), 0)
}

/// `10^exp` for any sign of `exp`
pub fn pow10(exp: i64) -> BigDecimal {
    BigDecimal::new(BigInt::one(), -exp)
}

/// `FULL_BPS` as a decimal
pub fn full_bps() -> BigDecimal {
    integer(FULL_BPS)
}

/// `value / FULL_BPS`, exact
pub fn from_bps(value: &BigDecimal) -> BigDecimal {
    value * pow10(-4)
}

/// `2^-64`, written exactly as `5^64 / 10^64`
pub fn q64_inverse() -> BigDecimal {
    BigDecimal::new(BigInt::from(5u8).pow(64), 64)
}

/// Fixed-point X64/Q64 numerator to its real value, `raw / 2^64`
pub fn from_x64(raw: &BigDecimal) -> BigDecimal {
    raw * q64_inverse()
}

/// `base^exp` by square-and-multiply, negative exponents through the inverse.
pub fn pow_int(base: &BigDecimal, exp: i64) -> RebalanceResult<BigDecimal> {
    if exp == 0 {
        return Ok(BigDecimal::one());
    }

    let mut result = BigDecimal::one();
    let mut factor = base.clone();
    let mut remaining = exp.unsigned_abs();

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = (&result * &factor).with_prec(PRICE_PRECISION);
        }
        remaining >>= 1;
        if remaining > 0 {
            factor = (&factor * &factor).with_prec(PRICE_PRECISION);
        }
    }

    if exp < 0 {
        if result.is_zero() {
            return Err(RebalanceError::DivisionByZero("negative integer power"));
        }
        result = result.inverse().with_prec(PRICE_PRECISION);
    }

    Ok(result)
}

// ============================================================================
// Integer Conversions
// ============================================================================

/// Integral value of a decimal, rejecting fractional input
pub fn to_bigint(value: &BigDecimal, label: &str) -> RebalanceResult<BigInt> {
    let truncated = value.with_scale(0);
    if &truncated != value {
        return Err(RebalanceError::invalid_value(
            label,
            format!("expected an integer, got {}", value),
        ));
    }
    let (digits, _) = truncated.into_bigint_and_exponent();
    Ok(digits)
}

fn to_primitive<T>(
    value: &BigDecimal,
    label: &str,
    type_name: &str,
    convert: impl FnOnce(&BigInt) -> Option<T>,
) -> RebalanceResult<T> {
    let digits = to_bigint(value, label)?;
    convert(&digits).ok_or_else(|| {
        RebalanceError::invalid_value(label, format!("{} does not fit in {}", value, type_name))
    })
}

pub fn to_u8(value: &BigDecimal, label: &str) -> RebalanceResult<u8> {
    to_primitive(value, label, "u8", |v| v.to_u8())
}

pub fn to_u16(value: &BigDecimal, label: &str) -> RebalanceResult<u16> {
    to_primitive(value, label, "u16", |v| v.to_u16())
}

pub fn to_i32(value: &BigDecimal, label: &str) -> RebalanceResult<i32> {
    to_primitive(value, label, "i32", |v| v.to_i32())
}

pub fn to_i64(value: &BigDecimal, label: &str) -> RebalanceResult<i64> {
    to_primitive(value, label, "i64", |v| v.to_i64())
}

pub fn to_u64(value: &BigDecimal, label: &str) -> RebalanceResult<u64> {
    to_primitive(value, label, "u64", |v| v.to_u64())
}

pub fn to_u128(value: &BigDecimal, label: &str) -> RebalanceResult<u128> {
    to_primitive(value, label, "u128", |v| v.to_u128())
}
