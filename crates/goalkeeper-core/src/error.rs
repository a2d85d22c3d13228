//! Shared error type across goalkeeper crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Missing, malformed, or blank input.
    InvalidInput,
    /// The document store failed.
    Store,
    /// Startup configuration is missing or invalid.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidInput => "INVALID_INPUT",
            ClientCode::Store => "STORE",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GoalError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum GoalError {
    #[error("invalid goal text")]
    InvalidText,
    #[error("store: {0}")]
    Store(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GoalError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GoalError::InvalidText => ClientCode::InvalidInput,
            GoalError::Store(_) => ClientCode::Store,
            GoalError::Config(_) => ClientCode::Config,
            GoalError::Internal(_) => ClientCode::Internal,
        }
    }

    /// True when the caller sent bad input rather than hitting a backend fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GoalError::InvalidText)
    }
}
