use bigdecimal::BigDecimal;

use crate::constants::{MAX_BIN_ID, MIN_BIN_ID};
use crate::errors::RebalanceResult;
use crate::math::tick_math::{bin_id_to_price, q64_price_to_price};
use crate::price::PriceConverter;
use crate::types::Dex;

/// Meteora DLMM: bin ids with a basis-point bin step, linear Q64 prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeteoraPriceConverter {
    decimals_a: u8,
    decimals_b: u8,
    bin_step: u16,
}

impl MeteoraPriceConverter {
    pub fn new(decimals_a: u8, decimals_b: u8, bin_step: u16) -> Self {
        Self {
            decimals_a,
            decimals_b,
            bin_step,
        }
    }
}

impl PriceConverter for MeteoraPriceConverter {
    fn dex(&self) -> Dex {
        Dex::Meteora
    }

    fn index_to_price(&self, index: i32) -> RebalanceResult<BigDecimal> {
        bin_id_to_price(index, self.bin_step, self.decimals_a, self.decimals_b)
    }

    // Q64 here is the price itself, not its square root
    fn fixed_point_to_price(&self, raw: &BigDecimal) -> BigDecimal {
        q64_price_to_price(raw, self.decimals_a, self.decimals_b)
    }

    // Bins are contiguous; the bin step is a price width, not an index stride
    fn index_stride(&self) -> i32 {
        1
    }

    fn index_bounds(&self) -> (i32, i32) {
        (MIN_BIN_ID, MAX_BIN_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_zero_ignores_step() {
        for bin_step in [1u16, 5, 80, 400] {
            let converter = MeteoraPriceConverter::new(6, 6, bin_step);
            assert_eq!(converter.index_to_price(0).unwrap(), BigDecimal::from(1));
        }
    }
}
