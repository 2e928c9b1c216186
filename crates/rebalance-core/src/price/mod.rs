//! # Price Conversion
//!
//! One [`PriceConverter`] per DEX, turning that protocol's native price
//! encodings into decimal prices normalized by token decimals.

mod meteora;
mod orca;
mod raydium;

pub use meteora::MeteoraPriceConverter;
pub use orca::OrcaPriceConverter;
pub use raydium::RaydiumPriceConverter;

use bigdecimal::BigDecimal;

use crate::constants::{MAX_TICK, MIN_TICK};
use crate::errors::{RebalanceError, RebalanceResult};
use crate::math::tick_math::search_index;
use crate::types::{Dex, PoolContext, PositionRange};

/// Native price encodings of a DEX
pub trait PriceConverter: Send + Sync {
    fn dex(&self) -> Dex;

    /// Price at a tick (Orca, Raydium) or bin id (Meteora)
    fn index_to_price(&self, index: i32) -> RebalanceResult<BigDecimal>;

    /// Price stored as a 64-bit fixed-point numerator.
    ///
    /// Orca and Raydium store square-root prices (squared here); Meteora
    /// stores the price itself.
    fn fixed_point_to_price(&self, raw: &BigDecimal) -> BigDecimal;

    /// Distance between two adjacent usable indices
    fn index_stride(&self) -> i32;

    fn index_bounds(&self) -> (i32, i32) {
        (MIN_TICK, MAX_TICK)
    }

    /// Greatest index whose price does not exceed `price`
    fn price_to_index(&self, price: &BigDecimal) -> RebalanceResult<i32> {
        let (min, max) = self.index_bounds();
        search_index(price, min, max, |index| self.index_to_price(index))
    }

    /// Prices at two indices
    fn index_range(&self, lower_index: i64, upper_index: i64) -> RebalanceResult<PositionRange> {
        let lower = i32::try_from(lower_index).map_err(|_| RebalanceError::TickOutOfRange(lower_index))?;
        let upper = i32::try_from(upper_index).map_err(|_| RebalanceError::TickOutOfRange(upper_index))?;
        Ok(PositionRange::new(
            self.index_to_price(lower)?,
            self.index_to_price(upper)?,
        ))
    }
}

/// Converter for the pool's DEX
pub fn price_converter(ctx: &PoolContext) -> Box<dyn PriceConverter> {
    tracing::trace!(dex = %ctx.dex, tick_spacing = ctx.tick_spacing, "selecting price converter");
    match ctx.dex {
        Dex::Orca => Box::new(OrcaPriceConverter::new(
            ctx.token_a_decimals,
            ctx.token_b_decimals,
            ctx.tick_spacing,
        )),
        Dex::Raydium => Box::new(RaydiumPriceConverter::new(
            ctx.token_a_decimals,
            ctx.token_b_decimals,
            ctx.tick_spacing,
        )),
        Dex::Meteora => Box::new(MeteoraPriceConverter::new(
            ctx.token_a_decimals,
            ctx.token_b_decimals,
            ctx.tick_spacing,
        )),
    }
}
