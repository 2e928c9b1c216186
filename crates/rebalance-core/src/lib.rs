//! # Rebalance Core - Strategy Field Reconciliation
//!
//! Decodes the on-chain parameter and state blobs of concentrated-liquidity
//! rebalance strategies and turns them into an ordered list of labeled fields.
//! It provides:
//!
//! - A layout-driven little-endian codec for six strategy variants
//! - Price conversion for Orca, Raydium and Meteora native price encodings
//! - Basis-point range math over arbitrary-precision decimals
//! - A merge engine overlaying live state onto configured parameters
//!
//! Everything here is pure: the same bytes and context always produce the
//! same fields.

pub mod codec;
pub mod config;
pub mod constants;
pub mod errors;
pub mod math;
pub mod merge;
pub mod price;
pub mod types;

// Re-export commonly used items
pub use codec::{codec_for, StrategyCodec};
pub use config::StrategyDefaults;
pub use errors::{ErrorKind, RebalanceError, RebalanceResult};
pub use merge::upsert_field_infos;
pub use price::{price_converter, PriceConverter};
pub use types::*;
