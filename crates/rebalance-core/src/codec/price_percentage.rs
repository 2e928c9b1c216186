//! Price percentage: a range `lowerRangeBps` below and `upperRangeBps` above
//! the price at the last rebalance. State stores the resulting bounds.

use bigdecimal::BigDecimal;

use crate::codec::labels::*;
use crate::codec::layout::{Encoding, FieldSpec, Layout};
use crate::codec::{range_price_fields, required, StrategyCodec};
use crate::config::{PricePercentageDefaults, StrategyDefaults};
use crate::errors::RebalanceResult;
use crate::math::decimal::integer;
use crate::math::range::price_range;
use crate::price::price_converter;
use crate::types::{FieldInfo, FieldsDict, PoolContext, PositionRange, RebalanceRaw, StrategyKind};

pub static PARAMS_LAYOUT: Layout = Layout::new(
    "price percentage params",
    &[
        FieldSpec::new(LOWER_RANGE_BPS, 0, Encoding::U16),
        FieldSpec::new(UPPER_RANGE_BPS, 2, Encoding::U16),
    ],
);

pub static STATE_LAYOUT: Layout = Layout::new(
    "price percentage state",
    &[
        FieldSpec::new(LOWER_SQRT_PRICE_X64, 0, Encoding::U128),
        FieldSpec::new(UPPER_SQRT_PRICE_X64, 16, Encoding::U128),
    ],
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePercentageParams {
    pub lower_range_bps: BigDecimal,
    pub upper_range_bps: BigDecimal,
}

impl PricePercentageParams {
    pub fn from_defaults(defaults: &PricePercentageDefaults) -> Self {
        Self {
            lower_range_bps: integer(defaults.lower_range_bps),
            upper_range_bps: integer(defaults.upper_range_bps),
        }
    }

    pub fn from_fields(values: &FieldsDict) -> RebalanceResult<Self> {
        Ok(Self {
            lower_range_bps: required(values, LOWER_RANGE_BPS)?,
            upper_range_bps: required(values, UPPER_RANGE_BPS)?,
        })
    }

    pub fn field_infos(&self, ctx: &PoolContext, enabled: bool) -> Vec<FieldInfo> {
        let range = price_range(&ctx.current_price, &self.lower_range_bps, &self.upper_range_bps);

        let mut fields = vec![
            StrategyKind::PricePercentage.type_field(enabled),
            FieldInfo::number(LOWER_RANGE_BPS, self.lower_range_bps.clone(), enabled),
            FieldInfo::number(UPPER_RANGE_BPS, self.upper_range_bps.clone(), enabled),
        ];
        fields.extend(range_price_fields(range));
        fields
    }
}

pub struct PricePercentageCodec;

impl StrategyCodec for PricePercentageCodec {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PricePercentage
    }

    fn params_layout(&self) -> &'static Layout {
        &PARAMS_LAYOUT
    }

    fn state_layout(&self) -> &'static Layout {
        &STATE_LAYOUT
    }

    fn default_field_infos(&self, ctx: &PoolContext, defaults: &StrategyDefaults) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(PricePercentageParams::from_defaults(&defaults.price_percentage).field_infos(ctx, true))
    }

    fn field_infos_from_params(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(PricePercentageParams::from_fields(&self.decode_params(raw)?)?.field_infos(ctx, true))
    }

    fn field_infos_from_state(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        let state = self.decode_state(raw)?;
        let converter = price_converter(ctx);
        let range = PositionRange::new(
            converter.fixed_point_to_price(state.require(LOWER_SQRT_PRICE_X64)?),
            converter.fixed_point_to_price(state.require(UPPER_SQRT_PRICE_X64)?),
        );
        Ok(range_price_fields(range).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use crate::types::{find_number, Dex};

    fn state_bytes(lower: u128, upper: u128) -> Vec<u8> {
        let mut data = lower.to_le_bytes().to_vec();
        data.extend_from_slice(&upper.to_le_bytes());
        data
    }

    #[test]
    fn test_decode_params() {
        let mut bytes = 300u16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&700u16.to_le_bytes());
        let raw = RebalanceRaw::from_params(bytes);
        let params =
            PricePercentageParams::from_fields(&PricePercentageCodec.decode_params(&raw).unwrap()).unwrap();

        assert_eq!(params.lower_range_bps, integer(300));
        assert_eq!(params.upper_range_bps, integer(700));
    }

    #[test]
    fn test_params_view() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 8, integer(100));
        let mut bytes = 500u16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&500u16.to_le_bytes());
        let fields = PricePercentageCodec
            .field_infos_from_params(&ctx, &RebalanceRaw::from_params(bytes))
            .unwrap();

        assert_eq!(find_number(&fields, LOWER_RANGE_BPS).unwrap(), &integer(500));
        assert_eq!(find_number(&fields, RANGE_PRICE_LOWER).unwrap(), &integer(95));
        assert_eq!(find_number(&fields, RANGE_PRICE_UPPER).unwrap(), &integer(105));
    }

    #[test]
    fn test_state_goes_through_dex_encoding() {
        let raw = RebalanceRaw::new(vec![0u8; 4], state_bytes(Q64, 3 * Q64));

        let orca = PoolContext::new(Dex::Orca, 6, 6, 8, integer(1));
        let fields = PricePercentageCodec.field_infos_with_state_override(&orca, &raw).unwrap();
        assert_eq!(find_number(&fields, RANGE_PRICE_LOWER).unwrap(), &integer(1));
        assert_eq!(find_number(&fields, RANGE_PRICE_UPPER).unwrap(), &integer(9));

        let meteora = PoolContext::new(Dex::Meteora, 6, 6, 8, integer(1));
        let fields = PricePercentageCodec.field_infos_with_state_override(&meteora, &raw).unwrap();
        assert_eq!(find_number(&fields, RANGE_PRICE_UPPER).unwrap(), &integer(3));
    }
}
