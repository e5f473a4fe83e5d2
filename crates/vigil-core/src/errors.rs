//! Cross-cutting error types for Vigil.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `OracleError`) are defined in
//! their respective crates. The boundary taxonomy that calling layers see is
//! `EngineError` in `vigil-engine`.

use thiserror::Error;

/// Errors that can be raised by any Vigil crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller supplied malformed input (bad URL, empty message).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A chat session was addressed that has never been initialized.
    #[error("Chat session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// A stored key did not have the expected layout.
    #[error("Malformed storage key: {0}")]
    MalformedKey(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
