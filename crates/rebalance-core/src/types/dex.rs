//! DEX identifiers and the pool context every price conversion runs against.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::errors::{RebalanceError, RebalanceResult};
use crate::math::decimal::pow10;

/// Supported concentrated-liquidity protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dex {
    Orca,
    Raydium,
    Meteora,
}

impl Dex {
    pub const ALL: [Dex; 3] = [Dex::Orca, Dex::Raydium, Dex::Meteora];

    /// Discriminant stored in the strategy account
    pub fn discriminant(self) -> u64 {
        match self {
            Dex::Orca => 0,
            Dex::Raydium => 1,
            Dex::Meteora => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dex::Orca => "ORCA",
            Dex::Raydium => "RAYDIUM",
            Dex::Meteora => "METEORA",
        }
    }
}

impl fmt::Display for Dex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dex {
    type Err = RebalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ORCA" => Ok(Dex::Orca),
            "RAYDIUM" => Ok(Dex::Raydium),
            "METEORA" => Ok(Dex::Meteora),
            _ => Err(RebalanceError::UnrecognizedDex(s.to_string())),
        }
    }
}

impl TryFrom<u64> for Dex {
    type Error = RebalanceError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Dex::ALL
            .into_iter()
            .find(|dex| dex.discriminant() == value)
            .ok_or_else(|| RebalanceError::UnrecognizedDex(value.to_string()))
    }
}

impl TryFrom<String> for Dex {
    type Error = RebalanceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dex> for String {
    fn from(dex: Dex) -> Self {
        dex.as_str().to_string()
    }
}

/// Pool facts supplied by the account layer alongside a `RebalanceRaw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolContext {
    pub dex: Dex,
    pub token_a_decimals: u8,
    pub token_b_decimals: u8,
    /// Tick spacing for Orca/Raydium, bin step in basis points for Meteora
    pub tick_spacing: u16,
    /// Current pool price, already normalized by token decimals
    pub current_price: BigDecimal,
}

impl PoolContext {
    pub fn new(
        dex: Dex,
        token_a_decimals: u8,
        token_b_decimals: u8,
        tick_spacing: u16,
        current_price: BigDecimal,
    ) -> Self {
        Self {
            dex,
            token_a_decimals,
            token_b_decimals,
            tick_spacing,
            current_price,
        }
    }

    /// `10^(decimals_a - decimals_b)`
    pub fn decimals_scale(&self) -> BigDecimal {
        pow10(self.token_a_decimals as i64 - self.token_b_decimals as i64)
    }

    /// Same context with a different current price
    pub fn with_price(&self, current_price: BigDecimal) -> Self {
        Self {
            current_price,
            ..self.clone()
        }
    }

    pub fn require_positive_price(&self) -> RebalanceResult<&BigDecimal> {
        if self.current_price <= BigDecimal::from(0) {
            return Err(RebalanceError::InvalidPrice(format!(
                "pool price must be positive, got {}",
                self.current_price
            )));
        }
        Ok(&self.current_price)
    }
}
