//! # Tick Math
//!
//! Conversions between tick/bin indices, X64 square-root prices and decimal
//! prices. Orca ticks go through `orca_whirlpools_core`; Raydium ticks use the
//! Q128 magic-constant decomposition shared by Uniswap-style pools, evaluated
//! on `ethnum::U256`; Meteora bins are a plain power of `1 + bin_step / 10000`.

use bigdecimal::BigDecimal;
use ethnum::U256;
use orca_whirlpools_core::tick_index_to_sqrt_price;

use crate::constants::{MAX_BIN_ID, MAX_TICK, MIN_BIN_ID, MIN_TICK};
use crate::errors::{RebalanceError, RebalanceResult};
use crate::math::decimal::{from_x64, integer, pow10, pow_int};

/// sqrt(1.0001)^-(2^i) in Q128, one entry per bit of |tick|
const SQRT_RATIO_Q128: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x09aa508b5b7a84e1c677de54f3e99bc9,
    0x005d6af8dedb81196699c329225ee604,
    0x00002216e584f5fa1ea926041bedfe98,
    0x00000000048a170391f7dc42444e8fa2,
];

/// Check a tick against the Orca/Raydium bounds
pub fn validate_tick(tick: i32) -> RebalanceResult<()> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(RebalanceError::TickOutOfRange(tick as i64));
    }
    Ok(())
}

/// Check a bin id against the Meteora bounds
pub fn validate_bin_id(bin_id: i32) -> RebalanceResult<()> {
    if !(MIN_BIN_ID..=MAX_BIN_ID).contains(&bin_id) {
        return Err(RebalanceError::TickOutOfRange(bin_id as i64));
    }
    Ok(())
}

// ============================================================================
// Tick -> sqrt price
// ============================================================================

/// Orca whirlpool sqrt price for a tick, X64
pub fn orca_sqrt_price_x64_from_tick(tick: i32) -> RebalanceResult<u128> {
    validate_tick(tick)?;
    Ok(tick_index_to_sqrt_price(tick).into())
}

/// Raydium CLMM sqrt price for a tick, X64, rounded up
pub fn get_sqrt_price_x64_from_tick(tick: i32) -> RebalanceResult<u128> {
    validate_tick(tick)?;

    let abs_tick = tick.unsigned_abs();
    let mut ratio = U256::ONE << 128u32;
    for (bit, magic) in SQRT_RATIO_Q128.iter().enumerate() {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = (ratio * U256::new(*magic)) >> 128u32;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128 -> Q64
    let remainder = ratio & U256::new(u64::MAX as u128);
    let mut sqrt_price = ratio >> 64u32;
    if remainder != U256::ZERO {
        sqrt_price += U256::ONE;
    }

    if sqrt_price > U256::new(u128::MAX) {
        return Err(RebalanceError::TickOutOfRange(tick as i64));
    }
    Ok(sqrt_price.as_u128())
}

// ============================================================================
// sqrt price -> price
// ============================================================================

/// `(sqrt_price_x64 / 2^64)^2 * 10^(decimals_a - decimals_b)`
pub fn sqrt_price_x64_to_price(sqrt_price_x64: &BigDecimal, decimals_a: u8, decimals_b: u8) -> BigDecimal {
    let sqrt_price = from_x64(sqrt_price_x64);
    &sqrt_price * &sqrt_price * pow10(decimals_a as i64 - decimals_b as i64)
}

/// Raydium naming of [`sqrt_price_x64_to_price`]
pub fn sqrt_price_to_price(sqrt_price_x64: &BigDecimal, decimals_a: u8, decimals_b: u8) -> BigDecimal {
    sqrt_price_x64_to_price(sqrt_price_x64, decimals_a, decimals_b)
}

/// Inverse of [`sqrt_price_x64_to_price`], rounded to the nearest integer
pub fn price_to_sqrt_price_x64(price: &BigDecimal, decimals_a: u8, decimals_b: u8) -> RebalanceResult<BigDecimal> {
    let unscaled = price * pow10(decimals_b as i64 - decimals_a as i64);
    let sqrt_price = unscaled
        .sqrt()
        .ok_or_else(|| RebalanceError::InvalidPrice(format!("no square root for {}", price)))?;
    Ok((sqrt_price * integer(1u128 << 64)).round(0))
}

/// Meteora Q64 price, linear: `(q64_price / 2^64) * 10^(decimals_a - decimals_b)`
pub fn q64_price_to_price(q64_price: &BigDecimal, decimals_a: u8, decimals_b: u8) -> BigDecimal {
    from_x64(q64_price) * pow10(decimals_a as i64 - decimals_b as i64)
}

// ============================================================================
// Index -> price
// ============================================================================

/// Orca tick price, through the whirlpool sqrt price
pub fn tick_index_to_price(tick: i32, decimals_a: u8, decimals_b: u8) -> RebalanceResult<BigDecimal> {
    let sqrt_price = orca_sqrt_price_x64_from_tick(tick)?;
    Ok(sqrt_price_x64_to_price(&integer(sqrt_price), decimals_a, decimals_b))
}

/// Raydium tick price, through the CLMM sqrt price
pub fn raydium_tick_index_to_price(tick: i32, decimals_a: u8, decimals_b: u8) -> RebalanceResult<BigDecimal> {
    let sqrt_price = get_sqrt_price_x64_from_tick(tick)?;
    Ok(sqrt_price_to_price(&integer(sqrt_price), decimals_a, decimals_b))
}

/// Meteora bin price: `(1 + bin_step / 10000)^bin_id * 10^(decimals_a - decimals_b)`
pub fn bin_id_to_price(bin_id: i32, bin_step: u16, decimals_a: u8, decimals_b: u8) -> RebalanceResult<BigDecimal> {
    validate_bin_id(bin_id)?;
    let base = BigDecimal::new((10_000u32 + bin_step as u32).into(), 4);
    Ok(pow_int(&base, bin_id as i64)? * pow10(decimals_a as i64 - decimals_b as i64))
}

// ============================================================================
// Price -> index
// ============================================================================

/// Greatest index in `[min, max]` whose price does not exceed `price`.
///
/// `index_price` must be non-decreasing in the index.
pub fn search_index(
    price: &BigDecimal,
    min: i32,
    max: i32,
    index_price: impl Fn(i32) -> RebalanceResult<BigDecimal>,
) -> RebalanceResult<i32> {
    if *price <= BigDecimal::from(0) {
        return Err(RebalanceError::InvalidPrice(format!("price must be positive, got {}", price)));
    }
    if index_price(min)? > *price {
        return Err(RebalanceError::InvalidPrice(format!("{} is below the lowest index price", price)));
    }

    let (mut low, mut high) = (min, max);
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if index_price(mid)? <= *price {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Ok(low)
}

/// Orca tick for a price, rounded down
pub fn price_to_tick_index(price: &BigDecimal, decimals_a: u8, decimals_b: u8) -> RebalanceResult<i32> {
    search_index(price, MIN_TICK, MAX_TICK, |tick| tick_index_to_price(tick, decimals_a, decimals_b))
}

/// Round an index down to a multiple of `stride`
pub fn snap_down(index: i32, stride: i32) -> i32 {
    if stride <= 1 {
        return index;
    }
    index.div_euclid(stride) * stride
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn assert_close(actual: &BigDecimal, expected: &BigDecimal, tolerance: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= dec(tolerance),
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_sqrt_price_at_tick_zero() {
        assert_eq!(get_sqrt_price_x64_from_tick(0).unwrap(), Q64);
        assert_eq!(orca_sqrt_price_x64_from_tick(0).unwrap(), Q64);
    }

    #[test]
    fn test_raydium_and_orca_sqrt_prices_agree() {
        let cases = [
            (-443_636, 6),
            (-100_000, 12),
            (-1_000, 12),
            (-1, 12),
            (1, 12),
            (64, 12),
            (1_000, 12),
            (100_000, 12),
            (443_636, 12),
        ];
        for (tick, digits) in cases {
            let raydium = integer(get_sqrt_price_x64_from_tick(tick).unwrap());
            let orca = integer(orca_sqrt_price_x64_from_tick(tick).unwrap());
            // Near the minimum tick the X64 value has only ten digits left
            let diff = (&raydium - &orca).abs();
            assert!(diff * pow10(digits) < orca, "tick {} diverges", tick);
        }
    }

    #[test]
    fn test_sqrt_price_is_monotonic() {
        let mut previous = get_sqrt_price_x64_from_tick(-1_000).unwrap();
        for tick in -999..=1_000 {
            let current = get_sqrt_price_x64_from_tick(tick).unwrap();
            assert!(current > previous, "tick {}", tick);
            previous = current;
        }
    }

    #[test]
    fn test_tick_out_of_range() {
        assert_eq!(
            get_sqrt_price_x64_from_tick(MAX_TICK + 1).unwrap_err(),
            RebalanceError::TickOutOfRange(443_637)
        );
        assert!(orca_sqrt_price_x64_from_tick(MIN_TICK - 1).is_err());
        assert!(tick_index_to_price(500_000, 9, 6).is_err());
    }

    #[test]
    fn test_tick_index_to_price() {
        assert_eq!(tick_index_to_price(0, 6, 6).unwrap(), dec("1"));
        assert_eq!(tick_index_to_price(0, 9, 6).unwrap(), dec("1000"));

        // 1.0001^100
        assert_close(&tick_index_to_price(100, 6, 6).unwrap(), &dec("1.0100496620928754"), "0.000000001");
        assert_close(&raydium_tick_index_to_price(-100, 6, 6).unwrap(), &dec("0.9900503287412095"), "0.000000001");
    }

    #[test]
    fn test_sqrt_price_to_price_scaling() {
        // sqrt price 2.0 -> price 4.0
        let sqrt_price = integer(2 * Q64);
        assert_eq!(sqrt_price_x64_to_price(&sqrt_price, 6, 6), dec("4"));
        assert_eq!(sqrt_price_to_price(&sqrt_price, 6, 9), dec("0.004"));
    }

    #[test]
    fn test_price_to_sqrt_price_inverts() {
        let sqrt_price = integer(get_sqrt_price_x64_from_tick(12_345).unwrap());
        let price = sqrt_price_x64_to_price(&sqrt_price, 9, 6);
        assert_eq!(price_to_sqrt_price_x64(&price, 9, 6).unwrap(), sqrt_price);
    }

    #[test]
    fn test_q64_price_is_linear() {
        let raw = integer(3 * Q64);
        assert_eq!(q64_price_to_price(&raw, 6, 6), dec("3"));
        assert_eq!(q64_price_to_price(&raw, 8, 6), dec("300"));
        // The same numerator read as a sqrt price would square
        assert_eq!(sqrt_price_x64_to_price(&raw, 6, 6), dec("9"));
    }

    #[test]
    fn test_bin_price() {
        for bin_step in [1u16, 10, 25, 100] {
            assert_eq!(bin_id_to_price(0, bin_step, 6, 6).unwrap(), dec("1"));
        }
        assert_eq!(bin_id_to_price(2, 100, 6, 6).unwrap(), dec("1.0201"));
        assert_eq!(bin_id_to_price(1, 25, 9, 6).unwrap(), dec("1002.5"));
        assert_close(&bin_id_to_price(-1, 100, 6, 6).unwrap(), &dec("0.9900990099009901"), "0.0000000000000001");
    }

    #[test]
    fn test_price_to_tick_index() {
        assert_eq!(price_to_tick_index(&dec("1"), 6, 6).unwrap(), 0);

        for tick in [-5_000, -10, 10, 7_777] {
            let price = tick_index_to_price(tick, 9, 6).unwrap();
            assert_eq!(price_to_tick_index(&price, 9, 6).unwrap(), tick);
        }

        assert!(matches!(
            price_to_tick_index(&dec("0"), 6, 6),
            Err(RebalanceError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_snap_down() {
        assert_eq!(snap_down(130, 64), 128);
        assert_eq!(snap_down(-1, 64), -64);
        assert_eq!(snap_down(-128, 64), -128);
        assert_eq!(snap_down(17, 1), 17);
    }
}
