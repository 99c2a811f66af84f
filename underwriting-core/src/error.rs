//! Error types for the underwriting core

use thiserror::Error;

/// Underwriting error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed numeric input (negative amount, non-positive tenure)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Policy configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Decimal arithmetic overflowed
    #[error("Calculation error: {0}")]
    Calculation(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
