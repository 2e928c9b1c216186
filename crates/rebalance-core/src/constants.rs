//! # Protocol Constants
//!
//! Fixed-point scales, basis-point denominators and index bounds shared by the
//! three supported DEXes.

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Q64 fixed-point scale factor: 2^64
pub const Q64: u128 = 1u128 << 64;

/// Basis points denominator (10,000 = 100%)
pub const FULL_BPS: u32 = 10_000;

/// Significant digits kept when raising a price base to an integer power
pub const PRICE_PRECISION: u64 = 64;

// ============================================================================
// Index Bounds
// ============================================================================

/// Minimum tick index supported by Orca and Raydium pools
pub const MIN_TICK: i32 = -443_636;

/// Maximum tick index supported by Orca and Raydium pools
pub const MAX_TICK: i32 = 443_636;

/// Minimum Meteora bin id
pub const MIN_BIN_ID: i32 = -443_636;

/// Maximum Meteora bin id
pub const MAX_BIN_ID: i32 = 443_636;

// ============================================================================
// Account Layout
// ============================================================================

/// Size of the on-chain params and state slots of a strategy account
pub const REBALANCE_RAW_SLOT_SIZE: usize = 128;

/// Label carrying the strategy name at the head of every field list
pub const REBALANCE_TYPE_LABEL: &str = "rebalanceType";
