//! # Type Definitions
//!
//! Field records, DEX and strategy identifiers, raw payloads.

pub mod dex;
pub mod field;
pub mod strategy;

pub use dex::*;
pub use field::*;
pub use strategy::*;
