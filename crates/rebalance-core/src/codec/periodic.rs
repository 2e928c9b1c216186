//! Periodic rebalance: recenters a percentage range every `period` seconds.

use bigdecimal::BigDecimal;

use crate::codec::labels::*;
use crate::codec::layout::{Encoding, FieldSpec, Layout};
use crate::codec::{range_price_fields, required, StrategyCodec};
use crate::config::{PeriodicDefaults, StrategyDefaults};
use crate::errors::RebalanceResult;
use crate::math::decimal::integer;
use crate::math::range::price_range;
use crate::types::{FieldInfo, FieldsDict, PoolContext, RebalanceRaw, StrategyKind};

pub static PARAMS_LAYOUT: Layout = Layout::new(
    "periodic params",
    &[
        FieldSpec::new(PERIOD, 0, Encoding::U64),
        FieldSpec::new(LOWER_RANGE_BPS, 8, Encoding::U16),
        FieldSpec::new(UPPER_RANGE_BPS, 10, Encoding::U16),
    ],
);

pub static STATE_LAYOUT: Layout = Layout::new(
    "periodic state",
    &[FieldSpec::new(LAST_REBALANCE_TIMESTAMP, 0, Encoding::U64)],
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicParams {
    /// Seconds between rebalances
    pub period: BigDecimal,
    pub lower_range_bps: BigDecimal,
    pub upper_range_bps: BigDecimal,
}

impl PeriodicParams {
    pub fn from_defaults(defaults: &PeriodicDefaults) -> Self {
        Self {
            period: integer(defaults.period),
            lower_range_bps: integer(defaults.lower_range_bps),
            upper_range_bps: integer(defaults.upper_range_bps),
        }
    }

    pub fn from_fields(values: &FieldsDict) -> RebalanceResult<Self> {
        Ok(Self {
            period: required(values, PERIOD)?,
            lower_range_bps: required(values, LOWER_RANGE_BPS)?,
            upper_range_bps: required(values, UPPER_RANGE_BPS)?,
        })
    }

    pub fn field_infos(&self, ctx: &PoolContext, enabled: bool) -> Vec<FieldInfo> {
        let range = price_range(&ctx.current_price, &self.lower_range_bps, &self.upper_range_bps);

        let mut fields = vec![
            StrategyKind::Periodic.type_field(enabled),
            FieldInfo::number(PERIOD, self.period.clone(), enabled),
            FieldInfo::number(LOWER_RANGE_BPS, self.lower_range_bps.clone(), enabled),
            FieldInfo::number(UPPER_RANGE_BPS, self.upper_range_bps.clone(), enabled),
        ];
        fields.extend(range_price_fields(range));
        fields
    }
}

pub struct PeriodicCodec;

impl StrategyCodec for PeriodicCodec {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Periodic
    }

    fn params_layout(&self) -> &'static Layout {
        &PARAMS_LAYOUT
    }

    fn state_layout(&self) -> &'static Layout {
        &STATE_LAYOUT
    }

    fn default_field_infos(&self, ctx: &PoolContext, defaults: &StrategyDefaults) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(PeriodicParams::from_defaults(&defaults.periodic).field_infos(ctx, true))
    }

    fn field_infos_from_params(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        Ok(PeriodicParams::from_fields(&self.decode_params(raw)?)?.field_infos(ctx, true))
    }

    // State only records when the last rebalance happened
    fn field_infos_from_state(&self, _ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>> {
        let state = self.decode_state(raw)?;
        Ok(vec![FieldInfo::number(
            LAST_REBALANCE_TIMESTAMP,
            required(&state, LAST_REBALANCE_TIMESTAMP)?,
            false,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{find_number, Dex};

    fn params_bytes(period: u64, lower: u16, upper: u16) -> Vec<u8> {
        let mut data = period.to_le_bytes().to_vec();
        data.extend_from_slice(&lower.to_le_bytes());
        data.extend_from_slice(&upper.to_le_bytes());
        data
    }

    #[test]
    fn test_decode_params() {
        let raw = RebalanceRaw::from_params(params_bytes(86_400, 250, 750));
        let params = PeriodicParams::from_fields(&PeriodicCodec.decode_params(&raw).unwrap()).unwrap();

        assert_eq!(params.period, integer(86_400));
        assert_eq!(params.lower_range_bps, integer(250));
        assert_eq!(params.upper_range_bps, integer(750));
    }

    #[test]
    fn test_params_view() {
        let ctx = PoolContext::new(Dex::Raydium, 9, 6, 1, integer(200));
        let raw = RebalanceRaw::from_params(params_bytes(86_400, 250, 750));
        let fields = PeriodicCodec.field_infos_from_params(&ctx, &raw).unwrap();

        assert_eq!(find_number(&fields, PERIOD).unwrap(), &integer(86_400));
        assert_eq!(find_number(&fields, RANGE_PRICE_LOWER).unwrap(), &integer(195));
        assert_eq!(find_number(&fields, RANGE_PRICE_UPPER).unwrap(), &integer(215));
    }

    #[test]
    fn test_state_only_adds_timestamp() {
        let ctx = PoolContext::new(Dex::Orca, 6, 6, 1, integer(1));
        let raw = RebalanceRaw::new(params_bytes(3600, 500, 500), 1_700_000_123u64.to_le_bytes().to_vec());

        let params = PeriodicCodec.field_infos_from_params(&ctx, &raw).unwrap();
        let merged = PeriodicCodec.field_infos_with_state_override(&ctx, &raw).unwrap();

        assert_eq!(merged.len(), params.len() + 1);
        assert_eq!(&merged[..params.len()], &params[..]);
        assert_eq!(
            merged.last().unwrap(),
            &FieldInfo::number(LAST_REBALANCE_TIMESTAMP, integer(1_700_000_123u64), false)
        );
    }
}
