//! Strategy variants and the raw payloads stored for them on-chain.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::constants::REBALANCE_TYPE_LABEL;
use crate::errors::{RebalanceError, RebalanceResult};
use crate::types::field::{find_field, FieldInfo};

/// Rebalance strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyKind {
    PricePercentage,
    PricePercentageWithReset,
    Drift,
    TakeProfit,
    Periodic,
    Expander,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::PricePercentage,
        StrategyKind::PricePercentageWithReset,
        StrategyKind::Drift,
        StrategyKind::TakeProfit,
        StrategyKind::Periodic,
        StrategyKind::Expander,
    ];

    /// Discriminant stored in the strategy account's `rebalance_type`
    pub fn discriminant(self) -> u8 {
        match self {
            StrategyKind::PricePercentage => 1,
            StrategyKind::PricePercentageWithReset => 2,
            StrategyKind::Drift => 3,
            StrategyKind::TakeProfit => 4,
            StrategyKind::Periodic => 5,
            StrategyKind::Expander => 6,
        }
    }

    /// Value of the `rebalanceType` field
    pub fn label_name(self) -> &'static str {
        match self {
            StrategyKind::PricePercentage => "pricePercentage",
            StrategyKind::PricePercentageWithReset => "pricePercentageWithReset",
            StrategyKind::Drift => "drift",
            StrategyKind::TakeProfit => "takeProfit",
            StrategyKind::Periodic => "periodicRebalance",
            StrategyKind::Expander => "expander",
        }
    }

    /// Leading `rebalanceType` field of this strategy's field list
    pub fn type_field(self, enabled: bool) -> FieldInfo {
        FieldInfo::text(REBALANCE_TYPE_LABEL, self.label_name(), enabled)
    }

    /// Strategy named by the `rebalanceType` field of a field list
    pub fn from_field_infos(fields: &[FieldInfo]) -> RebalanceResult<Self> {
        find_field(fields, REBALANCE_TYPE_LABEL)?.as_text()?.parse()
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_name())
    }
}

impl FromStr for StrategyKind {
    type Err = RebalanceError;

    /// Accepts label names (`periodicRebalance`) as well as plain variant
    /// names in any case (`Periodic`, `price_percentage`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "pricepercentage" => Ok(StrategyKind::PricePercentage),
            "pricepercentagewithreset" => Ok(StrategyKind::PricePercentageWithReset),
            "drift" => Ok(StrategyKind::Drift),
            "takeprofit" => Ok(StrategyKind::TakeProfit),
            "periodic" | "periodicrebalance" => Ok(StrategyKind::Periodic),
            "expander" => Ok(StrategyKind::Expander),
            _ => Err(RebalanceError::UnrecognizedStrategy(s.to_string())),
        }
    }
}

impl TryFrom<u8> for StrategyKind {
    type Error = RebalanceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.discriminant() == value)
            .ok_or_else(|| RebalanceError::UnrecognizedStrategy(value.to_string()))
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = RebalanceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StrategyKind> for String {
    fn from(kind: StrategyKind) -> Self {
        kind.label_name().to_string()
    }
}

/// Opaque params and state blobs exactly as stored on-chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceRaw {
    pub params: Vec<u8>,
    pub state: Vec<u8>,
}

impl RebalanceRaw {
    pub fn new(params: impl Into<Vec<u8>>, state: impl Into<Vec<u8>>) -> Self {
        Self {
            params: params.into(),
            state: state.into(),
        }
    }

    /// Params only; state left empty
    pub fn from_params(params: impl Into<Vec<u8>>) -> Self {
        Self::new(params, Vec::new())
    }
}

/// Lower and upper price bounds of a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRange {
    pub lower_price: BigDecimal,
    pub upper_price: BigDecimal,
}

impl PositionRange {
    pub fn new(lower_price: BigDecimal, upper_price: BigDecimal) -> Self {
        Self {
            lower_price,
            upper_price,
        }
    }
}
