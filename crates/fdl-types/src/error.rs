use thiserror::Error;

/// Errors produced by type parsing and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid deposit id: {0}")]
    InvalidDepositId(String),

    #[error("invalid deposit date: {0}")]
    InvalidDate(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("owner id must not be empty")]
    EmptyOwner,
}
