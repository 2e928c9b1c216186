//! # Mathematical Functions
//!
//! Decimal helpers, basis-point range math and DEX tick math.

pub mod decimal;
pub mod range;
pub mod tick_math;

// Re-export commonly used functions
pub use range::*;
pub use tick_math::*;
