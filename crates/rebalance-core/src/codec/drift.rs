//! Drift: a fixed-width tick range whose mid tick moves one stride every
//! `secondsPerTick` in `direction`.

use bigdecimal::BigDecimal;

use crate::codec::labels::*;
use crate::codec::layout::{Encoding, FieldSpec, Layout};
use crate::codec::{range_price_fields, required, StrategyCodec};
use crate::config::{DriftDefaults, StrategyDefaults};
use crate::errors::{RebalanceError, RebalanceResult};
use crate::math::decimal::{integer, to_i64};
use crate::math::tick_math::snap_down;
use crate::price::price_converter;
use crate::types::{FieldInfo, FieldsDict, PoolContext, PositionRange, RebalanceRaw, StrategyKind};

pub static PARAMS_LAYOUT: Layout = Layout::new(
    "drift params",
    &[
        FieldSpec::new(START_MID_TICK, 0, Encoding::I32),
        FieldSpec::new(TICKS_BELOW_MID, 4, Encoding::I32),
        FieldSpec::new(TICKS_ABOVE_MID, 8, Encoding::I32),
        FieldSpec::new(SECONDS_PER_TICK, 12, Encoding::U64),
        FieldSpec::new(DIRECTION, 20, Encoding::U8),
    ],
);

pub static STATE_LAYOUT: Layout = Layout::new(
    "drift state",
    &[
        FieldSpec::new(STEP, 0, Encoding::U8),
        FieldSpec::new(LAST_DRIFT_TIMESTAMP, 1, Encoding::U64),
        FieldSpec::new(LAST_MID_TICK, 9, Encoding::I32),
    ],
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftParams {
    pub start_mid_tick: BigDecimal,
    pub ticks_below_mid: BigDecimal,
    pub ticks_above_mid: BigDecimal,
    pub seconds_per_tick: BigDecimal,
    pub direction: BigDecimal,
}

impl DriftParams {
    /// Defaults centered on the index of the pool's current price
    pub fn from_defaults(ctx: &PoolContext, defaults: &DriftDefaults) -> RebalanceResult<Self> {
        let converter = price_converter(ctx);
        let mid = converter.price_to_index(ctx.require_positive_price()?)?;
        let start_mid_tick = snap_down(mid, converter.index_stride());

        Ok(Self {
            start_mid_tick: integer(start_mid_tick),
            ticks_below_mid: integer(defaults.ticks_below_mid),
            ticks_above_mid: integer(defaults.ticks_above_mid),
            seconds_per_tick: integer(defaults.seconds_per_tick),
            direction: integer(defaults.direction),
        })
    }

    pub fn from_fields(values: &FieldsDict) -> RebalanceResult<Self> {
        Ok(Self {
            start_mid_tick: required(values, START_MID_TICK)?,
            ticks_below_mid: required(values, TICKS_BELOW_MID)?,
            ticks_above_mid: required(values, TICKS_ABOVE_MID)?,
            seconds_per_tick: required(values, SECONDS_PER_TICK)?,
            direction: required(values, DIRECTION)?,
        })
    }

    /// Price range around `mid_tick`
    pub fn range_around(&self, ctx: &PoolContext, mid_tick: &BigDecimal) -> RebalanceResult<PositionRange> {
        drift_range(ctx, mid_tick, &self.ticks_below_mid, &self.ticks_above_mid)
    }

    pub fn field_infos(&self, ctx: &PoolContext, enabled: bool) -> RebalanceResult<Vec<FieldInfo>> {
        let range = self.range_around(ctx, &self.start_mid_tick)?;

        let mut fields = vec![
            StrategyKind::Drift.type_field(enabled),
            FieldInfo::number(START_MID_TICK, self.start_mid_tick.clone(), enabled),
            FieldInfo::number(TICKS_BELOW_MID, self.ticks_below_mid.clone(), enabled),
            FieldInfo::number(TICKS_ABOVE_MID, self.ticks_above_mid.clone(), enabled),
            FieldInfo::number(SECONDS_PER_TICK, self.seconds_per_tick.clone(), enabled),
            FieldInfo::number(DIRECTION, self.direction.clone(), enabled),
        ];
        fields.extend(range_price_fields(range));
        Ok(fields)
    }
}

/// `[mid - below * stride, mid + above * stride]` through the pool's converter
pub fn drift_range(
    ctx: &PoolContext,
    mid_tick: &BigDecimal,
    ticks_below: &BigDecimal,
    ticks_above: &BigDecimal,
) -> RebalanceResult<PositionRange> {
    let converter = price_converter(ctx);
    let stride = i64::from(converter.index_stride());

    let mid = to_i64(mid_tick, START_MID_TICK)?;
    let below = to_i64(ticks_below, TICKS_BELOW_MID)?;
    let above = to_i64(ticks_above, TICKS_ABOVE_MID)?;

    let lower = below
        .checked_mul(stride)
        .and_then(|offset| mid.checked_sub(offset))
        .ok_or(RebalanceError::TickOutOfRange(mid))?;
    let upper = above
        .checked_mul(stride)
        .and_then(|offset| mid.checked_add(offset))
        .ok_or(RebalanceError::TickOutOfRange(mid))?;

    converter.index_range(lower, upper)
}

pub struct DriftCodec;

impl StrategyCodec for DriftCodec {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Drift
    }

    fn params_layout(&self) -> &'static Layout {
        &PARAMS_LAYOUT
    }

    fn state_layout(&self) -> &'static Layout {
        &STATE_LAYOUT
    }

    fn default_field_infos(&self, ctx: &PoolContext, defaults: &StrategyDefaults) -> RebalanceResult<Vec<FieldInfo>> {
        DriftParams::from_defaults(ctx, &defaults.drift)?.field_infos(ctx, true)
    }

    fn field_infos_from_params(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        DriftParams::from_fields(&self.decode_params(raw)?)?.field_infos(ctx, true)
    }

    /// Range recomputed around the last mid tick, plus the drift progress
    fn field_infos_from_state(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        let params = DriftParams::from_fields(&self.decode_params(raw)?)?;
        let state = self.decode_state(raw)?;

        let last_mid_tick = required(&state, LAST_MID_TICK)?;
        let range = params.range_around(ctx, &last_mid_tick)?;

        let mut fields = range_price_fields(range).to_vec();
        fields.push(FieldInfo::number(LAST_MID_TICK, last_mid_tick, false));
        fields.push(FieldInfo::number(LAST_DRIFT_TIMESTAMP, required(&state, LAST_DRIFT_TIMESTAMP)?, false));
        fields.push(FieldInfo::number(STEP, required(&state, STEP)?, false));
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::math::tick_math::{bin_id_to_price, tick_index_to_price};
    use crate::types::{find_field, find_number, Dex};

    fn params_bytes(start: i32, below: i32, above: i32, seconds: u64, direction: u8) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&start.to_le_bytes());
        data.extend_from_slice(&below.to_le_bytes());
        data.extend_from_slice(&above.to_le_bytes());
        data.extend_from_slice(&seconds.to_le_bytes());
        data.push(direction);
        data
    }

    fn state_bytes(step: u8, timestamp: u64, last_mid: i32) -> Vec<u8> {
        let mut data = vec![step];
        data.extend_from_slice(&timestamp.to_le_bytes());
        data.extend_from_slice(&last_mid.to_le_bytes());
        data
    }

    #[test]
    fn test_decode_params() {
        let raw = RebalanceRaw::from_params(params_bytes(10, 5, 5, 259_200, 1));
        let params = DriftParams::from_fields(&DriftCodec.decode_params(&raw).unwrap()).unwrap();

        assert_eq!(params.start_mid_tick, integer(10));
        assert_eq!(params.ticks_below_mid, integer(5));
        assert_eq!(params.ticks_above_mid, integer(5));
        assert_eq!(params.seconds_per_tick, integer(259_200u64));
        assert_eq!(params.direction, integer(1));
    }

    #[test]
    fn test_range_scales_by_tick_spacing() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 4, integer(1));
        let raw = RebalanceRaw::from_params(params_bytes(100, 5, 10, 60, 0));
        let fields = DriftCodec.field_infos_from_params(&ctx, &raw).unwrap();

        assert_eq!(find_number(&fields, RANGE_PRICE_LOWER).unwrap(), &tick_index_to_price(80, 6, 6).unwrap());
        assert_eq!(find_number(&fields, RANGE_PRICE_UPPER).unwrap(), &tick_index_to_price(140, 6, 6).unwrap());
        assert!(!find_field(&fields, RANGE_PRICE_LOWER).unwrap().enabled);
        assert!(find_field(&fields, START_MID_TICK).unwrap().enabled);
    }

    #[test]
    fn test_meteora_bins_are_contiguous() {
        let ctx = PoolContext::new(Dex::Meteora, 6, 6, 25, integer(1));
        let raw = RebalanceRaw::from_params(params_bytes(10, 5, 5, 60, 1));
        let fields = DriftCodec.field_infos_from_params(&ctx, &raw).unwrap();

        assert_eq!(find_number(&fields, RANGE_PRICE_LOWER).unwrap(), &bin_id_to_price(5, 25, 6, 6).unwrap());
        assert_eq!(find_number(&fields, RANGE_PRICE_UPPER).unwrap(), &bin_id_to_price(15, 25, 6, 6).unwrap());
    }

    #[test]
    fn test_state_override_uses_last_mid_tick() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 1, integer(1));
        let raw = RebalanceRaw::new(params_bytes(10, 5, 5, 60, 1), state_bytes(3, 1_700_000_000, 100));
        let fields = DriftCodec.field_infos_with_state_override(&ctx, &raw).unwrap();

        let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                REBALANCE_TYPE,
                START_MID_TICK,
                TICKS_BELOW_MID,
                TICKS_ABOVE_MID,
                SECONDS_PER_TICK,
                DIRECTION,
                RANGE_PRICE_LOWER,
                RANGE_PRICE_UPPER,
                LAST_MID_TICK,
                LAST_DRIFT_TIMESTAMP,
                STEP,
            ]
        );
        assert_eq!(find_number(&fields, START_MID_TICK).unwrap(), &integer(10));
        assert_eq!(find_number(&fields, RANGE_PRICE_LOWER).unwrap(), &tick_index_to_price(95, 6, 6).unwrap());
        assert_eq!(find_number(&fields, RANGE_PRICE_UPPER).unwrap(), &tick_index_to_price(105, 6, 6).unwrap());
        assert_eq!(find_number(&fields, LAST_DRIFT_TIMESTAMP).unwrap(), &integer(1_700_000_000u64));
        assert!(!find_field(&fields, STEP).unwrap().enabled);
    }

    #[test]
    fn test_defaults_snap_to_spacing() {
        let ctx = PoolContext::new(Dex::Raydium, 6, 6, 8, integer(1));
        let fields = DriftCodec.default_field_infos(&ctx, &StrategyDefaults::default()).unwrap();
        assert_eq!(find_number(&fields, START_MID_TICK).unwrap(), &integer(0));

        let above_one = tick_index_to_price(13, 6, 6).unwrap();
        let params = DriftParams::from_defaults(&ctx.with_price(above_one), &DriftDefaults::default()).unwrap();
        assert_eq!(params.start_mid_tick, integer(8));
    }

    #[test]
    fn test_range_outside_tick_bounds() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 64, integer(1));
        let raw = RebalanceRaw::from_params(params_bytes(443_000, 1, 100, 60, 1));
        let err = DriftCodec.field_infos_from_params(&ctx, &raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Math);
    }

    #[test]
    fn test_encode_round_trip() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 1, integer(1));
        let bytes = params_bytes(-20, 3, 7, 86_400, 0);
        let fields = DriftCodec.field_infos_from_params(&ctx, &RebalanceRaw::from_params(bytes.clone())).unwrap();
        assert_eq!(DriftCodec.encode_params(&ctx, &fields).unwrap(), bytes);
    }
}
