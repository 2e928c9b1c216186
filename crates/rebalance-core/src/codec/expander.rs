//! Expander: a percentage range that widens by `expansionBps` on each side
//! every time it is hit, up to `maxNumberOfExpansions`, with a reset band
//! defined as a ratio of the current width.

use bigdecimal::BigDecimal;

use crate::codec::labels::*;
use crate::codec::layout::{Encoding, FieldSpec, Layout};
use crate::codec::{range_price_fields, required, reset_price_fields, StrategyCodec};
use crate::config::{ExpanderDefaults, StrategyDefaults};
use crate::errors::RebalanceResult;
use crate::math::decimal::integer;
use crate::math::range::{price_range, reset_range};
use crate::price::price_converter;
use crate::types::{FieldInfo, FieldsDict, PoolContext, PositionRange, RebalanceRaw, StrategyKind};

pub static PARAMS_LAYOUT: Layout = Layout::new(
    "expander params",
    &[
        FieldSpec::new(LOWER_RANGE_BPS, 0, Encoding::U16),
        FieldSpec::new(UPPER_RANGE_BPS, 2, Encoding::U16),
        FieldSpec::new(LOWER_RESET_RATIO_BPS, 4, Encoding::U16),
        FieldSpec::new(UPPER_RESET_RATIO_BPS, 6, Encoding::U16),
        FieldSpec::new(EXPANSION_BPS, 8, Encoding::U16),
        FieldSpec::new(MAX_NUMBER_OF_EXPANSIONS, 10, Encoding::U16),
        FieldSpec::new(SWAP_UNEVEN_ALLOWED, 12, Encoding::U8),
    ],
);

pub static STATE_LAYOUT: Layout = Layout::new(
    "expander state",
    &[
        FieldSpec::new(INITIAL_POOL_PRICE, 0, Encoding::U128),
        FieldSpec::new(EXPANSION_COUNT, 16, Encoding::U16),
    ],
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpanderParams {
    pub lower_range_bps: BigDecimal,
    pub upper_range_bps: BigDecimal,
    pub lower_reset_ratio_bps: BigDecimal,
    pub upper_reset_ratio_bps: BigDecimal,
    pub expansion_bps: BigDecimal,
    pub max_number_of_expansions: BigDecimal,
    pub swap_uneven_allowed: BigDecimal,
}

impl ExpanderParams {
    pub fn from_defaults(defaults: &ExpanderDefaults) -> Self {
        Self {
            lower_range_bps: integer(defaults.lower_range_bps),
            upper_range_bps: integer(defaults.upper_range_bps),
            lower_reset_ratio_bps: integer(defaults.lower_reset_ratio_bps),
            upper_reset_ratio_bps: integer(defaults.upper_reset_ratio_bps),
            expansion_bps: integer(defaults.expansion_bps),
            max_number_of_expansions: integer(defaults.max_number_of_expansions),
            swap_uneven_allowed: integer(defaults.swap_uneven_allowed),
        }
    }

    pub fn from_fields(values: &FieldsDict) -> RebalanceResult<Self> {
        Ok(Self {
            lower_range_bps: required(values, LOWER_RANGE_BPS)?,
            upper_range_bps: required(values, UPPER_RANGE_BPS)?,
            lower_reset_ratio_bps: required(values, LOWER_RESET_RATIO_BPS)?,
            upper_reset_ratio_bps: required(values, UPPER_RESET_RATIO_BPS)?,
            expansion_bps: required(values, EXPANSION_BPS)?,
            max_number_of_expansions: required(values, MAX_NUMBER_OF_EXPANSIONS)?,
            swap_uneven_allowed: required(values, SWAP_UNEVEN_ALLOWED)?,
        })
    }

    /// Range widths after `expansion_count` expansions
    pub fn expanded_bps(&self, expansion_count: &BigDecimal) -> (BigDecimal, BigDecimal) {
        let growth = &self.expansion_bps * expansion_count;
        (&self.lower_range_bps + &growth, &self.upper_range_bps + &growth)
    }

    /// Position and reset ranges around `price` after `expansion_count` expansions
    pub fn ranges(&self, price: &BigDecimal, expansion_count: &BigDecimal) -> (PositionRange, PositionRange) {
        let (lower_bps, upper_bps) = self.expanded_bps(expansion_count);
        let position = price_range(price, &lower_bps, &upper_bps);
        let reset = reset_range(
            price,
            &lower_bps,
            &upper_bps,
            &self.lower_reset_ratio_bps,
            &self.upper_reset_ratio_bps,
        );
        (position, reset)
    }

    pub fn field_infos(&self, ctx: &PoolContext, enabled: bool) -> Vec<FieldInfo> {
        let (position, reset) = self.ranges(&ctx.current_price, &integer(0));

        let mut fields = vec![
            StrategyKind::Expander.type_field(enabled),
            FieldInfo::number(LOWER_RANGE_BPS, self.lower_range_bps.clone(), enabled),
            FieldInfo::number(UPPER_RANGE_BPS, self.upper_range_bps.clone(), enabled),
            FieldInfo::number(LOWER_RESET_RATIO_BPS, self.lower_reset_ratio_bps.clone(), enabled),
            FieldInfo::number(UPPER_RESET_RATIO_BPS, self.upper_reset_ratio_bps.clone(), enabled),
            FieldInfo::number(EXPANSION_BPS, self.expansion_bps.clone(), enabled),
            FieldInfo::number(MAX_NUMBER_OF_EXPANSIONS, self.max_number_of_expansions.clone(), enabled),
            FieldInfo::number(SWAP_UNEVEN_ALLOWED, self.swap_uneven_allowed.clone(), enabled),
        ];
        fields.extend(range_price_fields(position));
        fields.extend(reset_price_fields(reset));
        fields
    }
}

pub struct ExpanderCodec;

impl StrategyCodec for ExpanderCodec {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Expander
    }

    fn params_layout(&self) -> &'static Layout {
        &PARAMS_LAYOUT
    }

    fn state_layout(&self) -> &'static Layout {
        &STATE_LAYOUT
    }

    fn default_field_infos(&self, ctx: &PoolContext, defaults: &StrategyDefaults) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(ExpanderParams::from_defaults(&defaults.expander).field_infos(ctx, true))
    }

    fn field_infos_from_params(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(ExpanderParams::from_fields(&self.decode_params(raw)?)?.field_infos(ctx, true))
    }

    /// Ranges around the initial pool price, widened by the expansions so far
    fn field_infos_from_state(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        let params = ExpanderParams::from_fields(&self.decode_params(raw)?)?;
        let state = self.decode_state(raw)?;

        let initial_price = price_converter(ctx).fixed_point_to_price(state.require(INITIAL_POOL_PRICE)?);
        let expansion_count = required(&state, EXPANSION_COUNT)?;
        let (position, reset) = params.ranges(&initial_price, &expansion_count);

        let mut fields = range_price_fields(position).to_vec();
        fields.extend(reset_price_fields(reset));
        fields.push(FieldInfo::number(EXPANSION_COUNT, expansion_count, false));
        Ok(fields)
    }
}
