use anyhow::{Context, Result};
use rebalance_core::StrategyDefaults;
use serde::{Deserialize, Serialize};

/// Inspector configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Strategy defaults for the `defaults` command
    pub defaults: StrategyDefaults,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty: true,
            defaults: StrategyDefaults::default(),
        }
    }
}

impl InspectorConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(anyhow::anyhow!("Unknown log level: {}", self.log_level));
        }
        self.defaults.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = InspectorConfig::from_toml_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert!(config.pretty);
        assert_eq!(config.defaults, StrategyDefaults::default());
    }

    #[test]
    fn test_nested_defaults() {
        let config = InspectorConfig::from_toml_str(
            r#"
            log_level = "debug"
            pretty = false

            [defaults.periodic]
            period = 7200
            "#,
        )
        .unwrap();
        assert!(!config.pretty);
        assert_eq!(config.defaults.periodic.period, 7200);
        assert_eq!(config.defaults.periodic.lower_range_bps, 500);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(InspectorConfig::from_toml_str("log_level = \"loud\"").is_err());
        assert!(InspectorConfig::from_toml_str("[defaults.take_profit]\ndestination_token = 3").is_err());
    }
}
