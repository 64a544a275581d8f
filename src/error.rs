//! Error types for session-ledger.

use thiserror::Error;

/// Main error type for ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Malformed caller input (body shape, enum value, id format).
    #[error("validation error: {0}")]
    Validation(String),

    /// A session identity was required but none was presented.
    #[error("session identity required")]
    SessionRequired,

    /// The durable backend failed to complete a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Unexpected server-side failure outside the storage layer.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Convenience Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
