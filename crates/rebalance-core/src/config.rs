//! # Strategy Defaults
//!
//! Named defaults for every strategy's field list, loaded from TOML and passed
//! explicitly into the codecs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::FULL_BPS;
use crate::errors::{RebalanceError, RebalanceResult};

/// Defaults used when a strategy has no stored params yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StrategyDefaults {
    pub drift: DriftDefaults,
    pub expander: ExpanderDefaults,
    pub periodic: PeriodicDefaults,
    pub price_percentage: PricePercentageDefaults,
    pub price_percentage_with_reset: PricePercentageWithResetDefaults,
    pub take_profit: TakeProfitDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DriftDefaults {
    /// Ticks (in units of the pool's index stride) below the mid tick
    pub ticks_below_mid: i32,
    pub ticks_above_mid: i32,
    pub seconds_per_tick: u64,
    /// 0 drifts down, 1 drifts up
    pub direction: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExpanderDefaults {
    pub lower_range_bps: u16,
    pub upper_range_bps: u16,
    pub lower_reset_ratio_bps: u16,
    pub upper_reset_ratio_bps: u16,
    /// Width added to each side per expansion
    pub expansion_bps: u16,
    pub max_number_of_expansions: u16,
    pub swap_uneven_allowed: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PeriodicDefaults {
    /// Seconds between rebalances
    pub period: u64,
    pub lower_range_bps: u16,
    pub upper_range_bps: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PricePercentageDefaults {
    pub lower_range_bps: u16,
    pub upper_range_bps: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PricePercentageWithResetDefaults {
    pub lower_range_bps: u16,
    pub upper_range_bps: u16,
    pub reset_lower_range_bps: u16,
    pub reset_upper_range_bps: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TakeProfitDefaults {
    /// Distance of the default lower target below the current price
    pub lower_price_bps: u16,
    pub upper_price_bps: u16,
    /// 0 takes profit into token A, 1 into token B
    pub destination_token: u8,
}

impl Default for DriftDefaults {
    fn default() -> Self {
        Self {
            ticks_below_mid: 10,
            ticks_above_mid: 10,
            seconds_per_tick: 259_200, // 3 days
            direction: 1,
        }
    }
}

impl Default for ExpanderDefaults {
    fn default() -> Self {
        Self {
            lower_range_bps: 500,
            upper_range_bps: 500,
            lower_reset_ratio_bps: 5_000,
            upper_reset_ratio_bps: 5_000,
            expansion_bps: 100,
            max_number_of_expansions: 10,
            swap_uneven_allowed: 1,
        }
    }
}

impl Default for PeriodicDefaults {
    fn default() -> Self {
        Self {
            period: 259_200, // 3 days
            lower_range_bps: 500,
            upper_range_bps: 500,
        }
    }
}

impl Default for PricePercentageDefaults {
    fn default() -> Self {
        Self {
            lower_range_bps: 500,
            upper_range_bps: 500,
        }
    }
}

impl Default for PricePercentageWithResetDefaults {
    fn default() -> Self {
        Self {
            lower_range_bps: 1_000,
            upper_range_bps: 1_000,
            reset_lower_range_bps: 5_000,
            reset_upper_range_bps: 5_000,
        }
    }
}

impl Default for TakeProfitDefaults {
    fn default() -> Self {
        Self {
            lower_price_bps: 1_000,
            upper_price_bps: 1_000,
            destination_token: 0,
        }
    }
}

impl StrategyDefaults {
    /// Parse and validate defaults from TOML text. Missing sections and keys
    /// fall back to the built-in values.
    pub fn from_toml_str(content: &str) -> RebalanceResult<Self> {
        let defaults: StrategyDefaults = toml::from_str(content)
            .map_err(|e| RebalanceError::invalid_config("strategy defaults", e.to_string()))?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Load defaults from a TOML file
    pub fn load(path: impl AsRef<Path>) -> RebalanceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RebalanceError::invalid_config(
                "strategy defaults",
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;
        tracing::debug!(path = %path.display(), "loading strategy defaults");
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> RebalanceResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RebalanceError::invalid_config("strategy defaults", e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> RebalanceResult<()> {
        check_flag("drift.direction", self.drift.direction)?;
        if self.drift.ticks_below_mid < 0 || self.drift.ticks_above_mid < 0 {
            return Err(RebalanceError::invalid_config(
                "drift.ticks_below_mid",
                "tick spans must not be negative",
            ));
        }
        if self.drift.seconds_per_tick == 0 {
            return Err(RebalanceError::invalid_config("drift.seconds_per_tick", "must be greater than 0"));
        }

        check_lower_width("expander.lower_range_bps", self.expander.lower_range_bps)?;
        check_flag("expander.swap_uneven_allowed", self.expander.swap_uneven_allowed)?;

        if self.periodic.period == 0 {
            return Err(RebalanceError::invalid_config("periodic.period", "must be greater than 0"));
        }
        check_lower_width("periodic.lower_range_bps", self.periodic.lower_range_bps)?;

        check_lower_width("price_percentage.lower_range_bps", self.price_percentage.lower_range_bps)?;

        let with_reset = &self.price_percentage_with_reset;
        check_lower_width("price_percentage_with_reset.lower_range_bps", with_reset.lower_range_bps)?;
        check_lower_width("price_percentage_with_reset.reset_lower_range_bps", with_reset.reset_lower_range_bps)?;

        check_lower_width("take_profit.lower_price_bps", self.take_profit.lower_price_bps)?;
        check_flag("take_profit.destination_token", self.take_profit.destination_token)?;

        Ok(())
    }
}

fn check_flag(field: &str, value: u8) -> RebalanceResult<()> {
    if value > 1 {
        return Err(RebalanceError::invalid_config(field, format!("expected 0 or 1, got {}", value)));
    }
    Ok(())
}

fn check_lower_width(field: &str, value: u16) -> RebalanceResult<()> {
    if u32::from(value) > FULL_BPS {
        return Err(RebalanceError::invalid_config(
            field,
            format!("at most {} (100%), got {}", FULL_BPS, value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_builtin_defaults_are_valid() {
        let defaults = StrategyDefaults::default();
        assert!(defaults.validate().is_ok());
        assert_eq!(defaults.drift.seconds_per_tick, 259_200);
        assert_eq!(defaults.price_percentage_with_reset.reset_lower_range_bps, 5_000);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let defaults = StrategyDefaults::from_toml_str(
            r#"
            [drift]
            ticks_below_mid = 4

            [periodic]
            period = 3600
            "#,
        )
        .unwrap();

        assert_eq!(defaults.drift.ticks_below_mid, 4);
        assert_eq!(defaults.drift.ticks_above_mid, 10);
        assert_eq!(defaults.periodic.period, 3600);
        assert_eq!(defaults.expander, ExpanderDefaults::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut defaults = StrategyDefaults::default();
        defaults.take_profit.destination_token = 1;
        let text = defaults.to_toml_string().unwrap();
        assert_eq!(StrategyDefaults::from_toml_str(&text).unwrap(), defaults);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = StrategyDefaults::from_toml_str("[drift]\ndirection = 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = StrategyDefaults::from_toml_str("[periodic]\nperiod = 0").unwrap_err();
        assert!(matches!(err, RebalanceError::InvalidConfig { ref field, .. } if field == "periodic.period"));

        let err = StrategyDefaults::from_toml_str("[price_percentage]\nlower_range_bps = 10001").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        assert!(StrategyDefaults::from_toml_str("[drift]\ndirection = \"up\"").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = StrategyDefaults::load("/nonexistent/defaults.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
