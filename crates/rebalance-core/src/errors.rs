//! # Core Error Types
//!
//! Every failure of a field-list computation is local to that call and none of
//! them are worth retrying: the inputs are immutable bytes and decimals.

use thiserror::Error;

/// Errors raised while decoding or reconciling rebalance fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RebalanceError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Unrecognized DEX: {0}")]
    UnrecognizedDex(String),

    #[error("Unrecognized rebalance strategy: {0}")]
    UnrecognizedStrategy(String),

    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    // ========================================================================
    // Decode Errors
    // ========================================================================

    #[error("Buffer too short for {layout}: need {required} bytes, got {actual}")]
    Truncated {
        layout: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Invalid value for '{label}': {reason}")]
    InvalidFieldValue { label: String, reason: String },

    // ========================================================================
    // Lookup Errors
    // ========================================================================

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Tick index {0} out of range")]
    TickOutOfRange(i64),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Division by zero in {0}")]
    DivisionByZero(&'static str),
}

/// Coarse classification of [`RebalanceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller misconfiguration (unknown DEX or strategy, bad defaults)
    Configuration,
    /// Bytes that do not fit the expected layout
    Decode,
    /// A labeled field expected in a list is absent
    Lookup,
    /// Numeric domain errors during price conversion
    Math,
}

/// Result type using rebalance errors
pub type RebalanceResult<T> = Result<T, RebalanceError>;

impl RebalanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedDex(_) | Self::UnrecognizedStrategy(_) | Self::InvalidConfig { .. } => {
                ErrorKind::Configuration
            }
            Self::Truncated { .. } | Self::InvalidFieldValue { .. } => ErrorKind::Decode,
            Self::FieldNotFound(_) => ErrorKind::Lookup,
            Self::TickOutOfRange(_) | Self::InvalidPrice(_) | Self::DivisionByZero(_) => {
                ErrorKind::Math
            }
        }
    }

    /// Decoding the same bytes again cannot change the outcome.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Create an invalid field value error
    pub fn invalid_value(label: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            label: label.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
