//! Price percentage with reset: a percentage range plus an inner reset band
//! whose widths are fractions of the range widths. Rebalancing triggers when
//! the price leaves the reset band, and state stores that band, so the
//! position bounds have to be inverted out of it.

use bigdecimal::BigDecimal;

use crate::codec::labels::*;
use crate::codec::layout::{Encoding, FieldSpec, Layout};
use crate::codec::{range_price_fields, required, reset_price_fields, StrategyCodec};
use crate::config::{PricePercentageWithResetDefaults, StrategyDefaults};
use crate::errors::RebalanceResult;
use crate::math::decimal::integer;
use crate::math::range::{position_range_from_reset, price_range, reset_range};
use crate::price::price_converter;
use crate::types::{FieldInfo, FieldsDict, PoolContext, PositionRange, RebalanceRaw, StrategyKind};

pub static PARAMS_LAYOUT: Layout = Layout::new(
    "price percentage with reset params",
    &[
        FieldSpec::new(LOWER_RANGE_BPS, 0, Encoding::U16),
        FieldSpec::new(UPPER_RANGE_BPS, 2, Encoding::U16),
        FieldSpec::new(RESET_LOWER_RANGE_BPS, 4, Encoding::U16),
        FieldSpec::new(RESET_UPPER_RANGE_BPS, 6, Encoding::U16),
    ],
);

pub static STATE_LAYOUT: Layout = Layout::new(
    "price percentage with reset state",
    &[
        FieldSpec::new(LOWER_RESET_SQRT_PRICE_X64, 0, Encoding::U128),
        FieldSpec::new(UPPER_RESET_SQRT_PRICE_X64, 16, Encoding::U128),
    ],
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePercentageWithResetParams {
    pub lower_range_bps: BigDecimal,
    pub upper_range_bps: BigDecimal,
    pub reset_lower_range_bps: BigDecimal,
    pub reset_upper_range_bps: BigDecimal,
}

impl PricePercentageWithResetParams {
    pub fn from_defaults(defaults: &PricePercentageWithResetDefaults) -> Self {
        Self {
            lower_range_bps: integer(defaults.lower_range_bps),
            upper_range_bps: integer(defaults.upper_range_bps),
            reset_lower_range_bps: integer(defaults.reset_lower_range_bps),
            reset_upper_range_bps: integer(defaults.reset_upper_range_bps),
        }
    }

    pub fn from_fields(values: &FieldsDict) -> RebalanceResult<Self> {
        Ok(Self {
            lower_range_bps: required(values, LOWER_RANGE_BPS)?,
            upper_range_bps: required(values, UPPER_RANGE_BPS)?,
            reset_lower_range_bps: required(values, RESET_LOWER_RANGE_BPS)?,
            reset_upper_range_bps: required(values, RESET_UPPER_RANGE_BPS)?,
        })
    }

    pub fn position_range(&self, price: &BigDecimal) -> PositionRange {
        price_range(price, &self.lower_range_bps, &self.upper_range_bps)
    }

    pub fn reset_range(&self, price: &BigDecimal) -> PositionRange {
        reset_range(
            price,
            &self.lower_range_bps,
            &self.upper_range_bps,
            &self.reset_lower_range_bps,
            &self.reset_upper_range_bps,
        )
    }

    /// Position bounds that produced the stored reset bounds
    pub fn position_from_reset(&self, reset: &PositionRange) -> RebalanceResult<PositionRange> {
        position_range_from_reset(
            reset,
            &self.lower_range_bps,
            &self.upper_range_bps,
            &self.reset_lower_range_bps,
            &self.reset_upper_range_bps,
        )
    }

    pub fn field_infos(&self, ctx: &PoolContext, enabled: bool) -> Vec<FieldInfo> {
        let mut fields = vec![
            StrategyKind::PricePercentageWithReset.type_field(enabled),
            FieldInfo::number(LOWER_RANGE_BPS, self.lower_range_bps.clone(), enabled),
            FieldInfo::number(UPPER_RANGE_BPS, self.upper_range_bps.clone(), enabled),
            FieldInfo::number(RESET_LOWER_RANGE_BPS, self.reset_lower_range_bps.clone(), enabled),
            FieldInfo::number(RESET_UPPER_RANGE_BPS, self.reset_upper_range_bps.clone(), enabled),
        ];
        fields.extend(range_price_fields(self.position_range(&ctx.current_price)));
        fields.extend(reset_price_fields(self.reset_range(&ctx.current_price)));
        fields
    }
}

pub struct PricePercentageWithResetCodec;

impl StrategyCodec for PricePercentageWithResetCodec {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PricePercentageWithReset
    }

    fn params_layout(&self) -> &'static Layout {
        &PARAMS_LAYOUT
    }

    fn state_layout(&self) -> &'static Layout {
        &STATE_LAYOUT
    }

    fn default_field_infos(&self, ctx: &PoolContext, defaults: &StrategyDefaults) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(PricePercentageWithResetParams::from_defaults(&defaults.price_percentage_with_reset).field_infos(ctx, true))
    }

    fn field_infos_from_params(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(PricePercentageWithResetParams::from_fields(&self.decode_params(raw)?)?.field_infos(ctx, true))
    }

    fn field_infos_from_state(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        let params = PricePercentageWithResetParams::from_fields(&self.decode_params(raw)?)?;
        let state = self.decode_state(raw)?;

        let converter = price_converter(ctx);
        let reset = PositionRange::new(
            converter.fixed_point_to_price(state.require(LOWER_RESET_SQRT_PRICE_X64)?),
            converter.fixed_point_to_price(state.require(UPPER_RESET_SQRT_PRICE_X64)?),
        );
        let position = params.position_from_reset(&reset)?;

        let mut fields = range_price_fields(position).to_vec();
        fields.extend(reset_price_fields(reset));
        Ok(fields)
    }
}
