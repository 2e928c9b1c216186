use bigdecimal::BigDecimal;

use crate::errors::RebalanceResult;
use crate::math::tick_math::{sqrt_price_x64_to_price, tick_index_to_price};
use crate::price::PriceConverter;
use crate::types::Dex;

/// Orca whirlpools: ticks and X64 square-root prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrcaPriceConverter {
    decimals_a: u8,
    decimals_b: u8,
    tick_spacing: u16,
}

impl OrcaPriceConverter {
    pub fn new(decimals_a: u8, decimals_b: u8, tick_spacing: u16) -> Self {
        Self {
            decimals_a,
            decimals_b,
            tick_spacing,
        }
    }
}

impl PriceConverter for OrcaPriceConverter {
    fn dex(&self) -> Dex {
        Dex::Orca
    }

    fn index_to_price(&self, index: i32) -> RebalanceResult<BigDecimal> {
        tick_index_to_price(index, self.decimals_a, self.decimals_b)
    }

    fn fixed_point_to_price(&self, raw: &BigDecimal) -> BigDecimal {
        sqrt_price_x64_to_price(raw, self.decimals_a, self.decimals_b)
    }

    fn index_stride(&self) -> i32 {
        self.tick_spacing.max(1) as i32
    }
}
