//! Rebalance Inspector
//!
//! Decodes hex-encoded rebalance strategy payloads, or renders a strategy's
//! default fields, and prints the field list as JSON.

mod config;

use std::str::FromStr;

use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use clap::{Args, Parser, Subcommand};
use config::InspectorConfig;
use rebalance_core::{codec_for, Dex, FieldInfo, PoolContext, RebalanceRaw, StrategyKind};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rebalance-inspector")]
#[command(about = "Decode rebalance strategy params and state into labeled fields")]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level, overrides the configured one
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode stored params, with live state overlaid when given
    Decode {
        #[command(flatten)]
        pool: PoolArgs,

        /// Params blob as hex
        #[arg(long)]
        params: String,

        /// State blob as hex
        #[arg(long)]
        state: Option<String>,
    },
    /// Print the default field list
    Defaults {
        #[command(flatten)]
        pool: PoolArgs,
    },
}

#[derive(Args)]
struct PoolArgs {
    /// Strategy name, e.g. drift or pricePercentageWithReset
    #[arg(short, long)]
    strategy: String,

    /// DEX: orca, raydium or meteora
    #[arg(short, long)]
    dex: String,

    #[arg(long, default_value = "6")]
    decimals_a: u8,

    #[arg(long, default_value = "6")]
    decimals_b: u8,

    /// Tick spacing, or bin step for Meteora
    #[arg(long, default_value = "1")]
    tick_spacing: u16,

    /// Current pool price
    #[arg(long, default_value = "1")]
    price: String,
}

impl PoolArgs {
    fn resolve(&self) -> Result<(StrategyKind, PoolContext)> {
        let kind = StrategyKind::from_str(&self.strategy)?;
        let dex = Dex::from_str(&self.dex)?;
        let price = BigDecimal::from_str(&self.price)
            .with_context(|| format!("Invalid price: {}", self.price))?;
        let ctx = PoolContext::new(dex, self.decimals_a, self.decimals_b, self.tick_spacing, price);
        Ok((kind, ctx))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => InspectorConfig::from_file(path)?,
        None => InspectorConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(&config)?;

    let fields = match cli.command {
        Command::Decode { pool, params, state } => {
            let (kind, ctx) = pool.resolve()?;
            let raw = RebalanceRaw::new(
                parse_hex(&params).context("Invalid params hex")?,
                state
                    .as_deref()
                    .map(parse_hex)
                    .transpose()
                    .context("Invalid state hex")?
                    .unwrap_or_default(),
            );
            info!(strategy = %kind, dex = %ctx.dex, params = raw.params.len(), state = raw.state.len(), "decoding");

            let codec = codec_for(kind);
            if state.is_some() {
                codec.field_infos_with_state_override(&ctx, &raw)?
            } else {
                codec.field_infos_from_params(&ctx, &raw)?
            }
        }
        Command::Defaults { pool } => {
            let (kind, ctx) = pool.resolve()?;
            info!(strategy = %kind, dex = %ctx.dex, "rendering defaults");
            codec_for(kind).default_field_infos(&ctx, &config.defaults)?
        }
    };

    debug!("Produced {} fields", fields.len());
    println!("{}", render(&fields, config.pretty)?);
    Ok(())
}

fn init_logging(config: &InspectorConfig) -> Result<()> {
    let log_level: tracing::Level = config.log_level.parse()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("rebalance_inspector={},rebalance_core={}", log_level, log_level).into()
                })
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

/// Hex bytes, with or without a `0x` prefix
fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    Ok(hex::decode(digits)?)
}

fn render(fields: &[FieldInfo], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(fields)?
    } else {
        serde_json::to_string(fields)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x0a00ff").unwrap(), vec![0x0a, 0x00, 0xff]);
        assert_eq!(parse_hex(" 0102 ").unwrap(), vec![1, 2]);
        assert!(parse_hex("0x123").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_cli_parses_decode() {
        let cli = Cli::try_parse_from([
            "rebalance-inspector",
            "decode",
            "--strategy",
            "drift",
            "--dex",
            "orca",
            "--tick-spacing",
            "8",
            "--params",
            "00",
        ])
        .unwrap();

        match cli.command {
            Command::Decode { pool, params, state } => {
                let (kind, ctx) = pool.resolve().unwrap();
                assert_eq!(kind, StrategyKind::Drift);
                assert_eq!(ctx.dex, Dex::Orca);
                assert_eq!(ctx.tick_spacing, 8);
                assert_eq!(params, "00");
                assert!(state.is_none());
            }
            Command::Defaults { .. } => panic!("expected decode"),
        }
    }

    #[test]
    fn test_resolve_rejects_unknown_dex() {
        let cli = Cli::try_parse_from([
            "rebalance-inspector",
            "defaults",
            "--strategy",
            "expander",
            "--dex",
            "curve",
        ])
        .unwrap();
        let Command::Defaults { pool } = cli.command else {
            panic!("expected defaults");
        };
        assert!(pool.resolve().is_err());
    }

    #[test]
    fn test_render_compact() {
        let fields = vec![StrategyKind::Drift.type_field(true)];
        assert_eq!(
            render(&fields, false).unwrap(),
            r#"[{"label":"rebalanceType","type":"string","value":"drift","enabled":true}]"#
        );
    }
}
