//! Take profit: close into `destinationToken` once the price leaves an
//! absolute band.
//!
//! Bounds are stored as X64 square-root prices and always read with the
//! Raydium square-root formula, whatever the pool's DEX. For Meteora pools
//! this differs from the linear Q64 reading used by the other strategies.

use bigdecimal::BigDecimal;

use crate::codec::labels::*;
use crate::codec::layout::{Encoding, FieldSpec, Layout};
use crate::codec::{ensure_kind, required, StrategyCodec};
use crate::config::{StrategyDefaults, TakeProfitDefaults};
use crate::errors::RebalanceResult;
use crate::math::decimal::integer;
use crate::math::range::price_range;
use crate::math::tick_math::{price_to_sqrt_price_x64, sqrt_price_to_price};
use crate::types::{find_number, FieldInfo, FieldsDict, PoolContext, RebalanceRaw, StrategyKind};

pub static PARAMS_LAYOUT: Layout = Layout::new(
    "take profit params",
    &[
        FieldSpec::new(LOWER_SQRT_PRICE_X64, 0, Encoding::U128),
        FieldSpec::new(UPPER_SQRT_PRICE_X64, 16, Encoding::U128),
        FieldSpec::new(DESTINATION_TOKEN, 32, Encoding::U8),
    ],
);

pub static STATE_LAYOUT: Layout = Layout::new("take profit state", &[FieldSpec::new(STEP, 0, Encoding::U8)]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeProfitParams {
    pub lower_price: BigDecimal,
    pub upper_price: BigDecimal,
    /// 0 for token A, 1 for token B
    pub destination_token: BigDecimal,
}

impl TakeProfitParams {
    /// Band `lower_price_bps` / `upper_price_bps` around the current price
    pub fn from_defaults(ctx: &PoolContext, defaults: &TakeProfitDefaults) -> Self {
        let range = price_range(
            &ctx.current_price,
            &integer(defaults.lower_price_bps),
            &integer(defaults.upper_price_bps),
        );
        Self {
            lower_price: range.lower_price,
            upper_price: range.upper_price,
            destination_token: integer(defaults.destination_token),
        }
    }

    /// From decoded params, converting the stored square-root prices
    pub fn from_fields(ctx: &PoolContext, values: &FieldsDict) -> RebalanceResult<Self> {
        let (decimals_a, decimals_b) = (ctx.token_a_decimals, ctx.token_b_decimals);
        Ok(Self {
            lower_price: sqrt_price_to_price(values.require(LOWER_SQRT_PRICE_X64)?, decimals_a, decimals_b),
            upper_price: sqrt_price_to_price(values.require(UPPER_SQRT_PRICE_X64)?, decimals_a, decimals_b),
            destination_token: required(values, DESTINATION_TOKEN)?,
        })
    }

    /// From an edited field list
    pub fn from_field_infos(fields: &[FieldInfo]) -> RebalanceResult<Self> {
        Ok(Self {
            lower_price: find_number(fields, RANGE_PRICE_LOWER)?.clone(),
            upper_price: find_number(fields, RANGE_PRICE_UPPER)?.clone(),
            destination_token: find_number(fields, DESTINATION_TOKEN)?.clone(),
        })
    }

    /// Values keyed by the params layout labels
    pub fn to_fields(&self, ctx: &PoolContext) -> RebalanceResult<FieldsDict> {
        let (decimals_a, decimals_b) = (ctx.token_a_decimals, ctx.token_b_decimals);
        let mut values = FieldsDict::new();
        values.insert(
            LOWER_SQRT_PRICE_X64,
            price_to_sqrt_price_x64(&self.lower_price, decimals_a, decimals_b)?,
        );
        values.insert(
            UPPER_SQRT_PRICE_X64,
            price_to_sqrt_price_x64(&self.upper_price, decimals_a, decimals_b)?,
        );
        values.insert(DESTINATION_TOKEN, self.destination_token.clone());
        Ok(values)
    }

    pub fn field_infos(&self, enabled: bool) -> Vec<FieldInfo> {
        vec![
            StrategyKind::TakeProfit.type_field(enabled),
            FieldInfo::number(RANGE_PRICE_LOWER, self.lower_price.clone(), enabled),
            FieldInfo::number(RANGE_PRICE_UPPER, self.upper_price.clone(), enabled),
            FieldInfo::number(DESTINATION_TOKEN, self.destination_token.clone(), enabled),
        ]
    }
}

pub struct TakeProfitCodec;

impl StrategyCodec for TakeProfitCodec {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TakeProfit
    }

    fn params_layout(&self) -> &'static Layout {
        &PARAMS_LAYOUT
    }

    fn state_layout(&self) -> &'static Layout {
        &STATE_LAYOUT
    }

    fn default_field_infos(&self, ctx: &PoolContext, defaults: &StrategyDefaults) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(TakeProfitParams::from_defaults(ctx, &defaults.take_profit).field_infos(true))
    }

    fn field_infos_from_params(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(TakeProfitParams::from_fields(ctx, &self.decode_params(raw)?)?.field_infos(true))
    }

    fn field_infos_from_state(&self, _ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        let state = self.decode_state(raw)?;
        Ok(vec![FieldInfo::number(STEP, required(&state, STEP)?, false)])
    }

    /// Prices are written back as X64 square-root prices
    fn encode_params(&self, ctx: &PoolContext, fields: &[FieldInfo]) -> RebalanceResult<Vec<u8>> {
        ensure_kind(self.kind(), fields)?;
        let params = TakeProfitParams::from_field_infos(fields)?;
        self.params_layout().encode(&params.to_fields(ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use crate::errors::RebalanceError;
    use crate::types::Dex;

    fn params_bytes(lower: u128, upper: u128, destination: u8) -> Vec<u8> {
        let mut data = lower.to_le_bytes().to_vec();
        data.extend_from_slice(&upper.to_le_bytes());
        data.push(destination);
        data
    }

    #[test]
    fn test_decode_params() {
        let raw = RebalanceRaw::from_params(params_bytes(2 * Q64, 3 * Q64, 1));
        let values = TakeProfitCodec.decode_params(&raw).unwrap();

        assert_eq!(values.require(LOWER_SQRT_PRICE_X64).unwrap(), &integer(2 * Q64));
        assert_eq!(values.require(UPPER_SQRT_PRICE_X64).unwrap(), &integer(3 * Q64));
        assert_eq!(values.require(DESTINATION_TOKEN).unwrap(), &integer(1));

        let ctx = PoolContext::new(Dex::Orca, 6, 6, 8, integer(1));
        let params = TakeProfitParams::from_fields(&ctx, &values).unwrap();
        assert_eq!(params.lower_price, integer(4));
        assert_eq!(params.upper_price, integer(9));
        assert_eq!(params.destination_token, integer(1));
    }

    #[test]
    fn test_params_decode_squares_on_every_dex() {
        let raw = RebalanceRaw::from_params(params_bytes(2 * Q64, 3 * Q64, 1));
        for dex in Dex::ALL {
            let ctx = PoolContext::new(dex, 6, 6, 8, integer(1));
            let fields = TakeProfitCodec.field_infos_from_params(&ctx, &raw).unwrap();
            assert_eq!(find_number(&fields, RANGE_PRICE_LOWER).unwrap(), &integer(4), "{}", dex);
            assert_eq!(find_number(&fields, RANGE_PRICE_UPPER).unwrap(), &integer(9), "{}", dex);
            assert_eq!(find_number(&fields, DESTINATION_TOKEN).unwrap(), &integer(1));
        }
    }

    #[test]
    fn test_prices_are_editable() {
        let ctx = PoolContext::new(Dex::Raydium, 6, 6, 8, integer(100));
        let fields = TakeProfitCodec.default_field_infos(&ctx, &StrategyDefaults::default()).unwrap();
        assert_eq!(fields[1], FieldInfo::number(RANGE_PRICE_LOWER, integer(90), true));
        assert_eq!(fields[2], FieldInfo::number(RANGE_PRICE_UPPER, integer(110), true));
        assert_eq!(fields[3], FieldInfo::number(DESTINATION_TOKEN, integer(0), true));
    }

    #[test]
    fn test_encode_writes_sqrt_prices() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 8, integer(1));
        let params = TakeProfitParams {
            lower_price: integer(4),
            upper_price: integer(9),
            destination_token: integer(0),
        };
        let bytes = TakeProfitCodec.encode_params(&ctx, &params.field_infos(true)).unwrap();
        assert_eq!(bytes, params_bytes(2 * Q64, 3 * Q64, 0));
    }

    #[test]
    fn test_encode_rejects_negative_price() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 8, integer(1));
        let params = TakeProfitParams {
            lower_price: integer(-1),
            upper_price: integer(9),
            destination_token: integer(0),
        };
        let err = TakeProfitCodec.encode_params(&ctx, &params.field_infos(true)).unwrap_err();
        assert!(matches!(err, RebalanceError::InvalidPrice(_)));
    }

    #[test]
    fn test_state_adds_step() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 8, integer(1));
        let raw = RebalanceRaw::new(params_bytes(Q64, Q64, 0), vec![2u8]);
        let fields = TakeProfitCodec.field_infos_with_state_override(&ctx, &raw).unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[4], FieldInfo::number(STEP, integer(2), false));
    }
}
