//! # Strategy Codec
//!
//! One [`StrategyCodec`] per rebalance strategy. Each pairs a params and a
//! state [`Layout`] with the rules that turn decoded values into the
//! strategy's field list:
//!
//! - **defaults**: named defaults plus the pool's current price
//! - **params**: stored params, ranges derived from the current price
//! - **state override**: params view with live state fields upserted on top
//!
//! Every field list starts with the `rebalanceType` text field.

pub mod drift;
pub mod expander;
pub mod labels;
pub mod layout;
pub mod periodic;
pub mod price_percentage;
pub mod price_percentage_with_reset;
pub mod take_profit;

pub use drift::{DriftCodec, DriftParams};
pub use expander::{ExpanderCodec, ExpanderParams};
pub use layout::{Encoding, FieldSpec, Layout};
pub use periodic::{PeriodicCodec, PeriodicParams};
pub use price_percentage::{PricePercentageCodec, PricePercentageParams};
pub use price_percentage_with_reset::{PricePercentageWithResetCodec, PricePercentageWithResetParams};
pub use take_profit::{TakeProfitCodec, TakeProfitParams};

use bigdecimal::BigDecimal;

use crate::config::StrategyDefaults;
use crate::errors::{RebalanceError, RebalanceResult};
use crate::merge::upsert_field_infos;
use crate::types::{FieldInfo, FieldsDict, PoolContext, PositionRange, RebalanceRaw, StrategyKind};

/// Codec and field assembly of one strategy
pub trait StrategyCodec: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn params_layout(&self) -> &'static Layout;

    fn state_layout(&self) -> &'static Layout;

    /// Field list built from the named defaults
    fn default_field_infos(&self, ctx: &PoolContext, defaults: &StrategyDefaults) -> RebalanceResult<Vec<FieldInfo>>;

    /// Field list built from stored params
    fn field_infos_from_params(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>>;

    /// Fields the live state overrides. May read params as well.
    fn field_infos_from_state(&self, ctx: &PoolContext, raw: &RebalanceRaw) -> RebalanceResult<Vec<FieldInfo>>;

    /// Params view with the state view upserted on top
    fn field_infos_with_state_override(
        &self,
        ctx: &PoolContext,
        raw: &RebalanceRaw,
    ) -> RebalanceResult<Vec<FieldInfo>> {
        let params = self.field_infos_from_params(ctx, raw)?;
        let state = self.field_infos_from_state(ctx, raw)?;
        tracing::debug!(
            strategy = %self.kind(),
            params = params.len(),
            state = state.len(),
            "merging state over params"
        );
        Ok(upsert_field_infos(params, state))
    }

    fn decode_params(&self, raw: &RebalanceRaw) -> RebalanceResult<FieldsDict> {
        self.params_layout().decode(&raw.params)
    }

    fn decode_state(&self, raw: &RebalanceRaw) -> RebalanceResult<FieldsDict> {
        self.state_layout().decode(&raw.state)
    }

    /// Write the editable fields of `fields` back into the params layout
    fn encode_params(&self, _ctx: &PoolContext, fields: &[FieldInfo]) -> RebalanceResult<Vec<u8>> {
        ensure_kind(self.kind(), fields)?;
        self.params_layout().encode(&FieldsDict::from_field_infos(fields))
    }
}

/// Codec for a strategy
pub fn codec_for(kind: StrategyKind) -> &'static dyn StrategyCodec {
    match kind {
        StrategyKind::Drift => &DriftCodec,
        StrategyKind::Expander => &ExpanderCodec,
        StrategyKind::Periodic => &PeriodicCodec,
        StrategyKind::PricePercentage => &PricePercentageCodec,
        StrategyKind::PricePercentageWithReset => &PricePercentageWithResetCodec,
        StrategyKind::TakeProfit => &TakeProfitCodec,
    }
}

/// Fail unless `fields` names `kind` in its `rebalanceType` field
pub(crate) fn ensure_kind(kind: StrategyKind, fields: &[FieldInfo]) -> RebalanceResult<()> {
    let named = StrategyKind::from_field_infos(fields)?;
    if named != kind {
        return Err(RebalanceError::invalid_value(
            labels::REBALANCE_TYPE,
            format!("expected {}, got {}", kind, named),
        ));
    }
    Ok(())
}

/// `rangePriceLower` / `rangePriceUpper`, read-only
pub(crate) fn range_price_fields(range: PositionRange) -> [FieldInfo; 2] {
    [
        FieldInfo::number(labels::RANGE_PRICE_LOWER, range.lower_price, false),
        FieldInfo::number(labels::RANGE_PRICE_UPPER, range.upper_price, false),
    ]
}

/// `resetPriceLower` / `resetPriceUpper`, read-only
pub(crate) fn reset_price_fields(range: PositionRange) -> [FieldInfo; 2] {
    [
        FieldInfo::number(labels::RESET_PRICE_LOWER, range.lower_price, false),
        FieldInfo::number(labels::RESET_PRICE_UPPER, range.upper_price, false),
    ]
}

pub(crate) fn required(values: &FieldsDict, label: &str) -> RebalanceResult<BigDecimal> {
    values.require(label).cloned()
}
