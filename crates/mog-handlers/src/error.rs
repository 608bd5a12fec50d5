//! Error types for handler directory operations.

use thiserror::Error;

/// Errors that can occur during handler directory operations.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// An internal lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for handler directory operations.
pub type Result<T> = std::result::Result<T, HandlerError>;
