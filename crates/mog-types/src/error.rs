use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid handler address: {0}")]
    InvalidAddress(String),

    #[error("invalid port in {input}: {reason}")]
    InvalidPort { input: String, reason: String },

    #[error("invalid handler id: {0}")]
    InvalidHandlerId(String),
}
