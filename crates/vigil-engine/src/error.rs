//! Errors that cross the engine boundary.
//!
//! Classification and oracle failures never appear here; they are absorbed
//! into fallback records and apology text before reaching this layer.

use thiserror::Error;
use vigil_db::DatabaseError;
use vigil_registry::RegistryError;

use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad input from the caller.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The renderer could not load the page.
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    /// A message was sent to a session that was never initialized.
    #[error("Chat session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// Storage failed during an operation whose purpose is storage.
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// A session actor stopped before replying.
    #[error("Session '{session_id}' is unavailable")]
    SessionUnavailable { session_id: String },
}

impl From<RegistryError> for EngineError {
    fn from(e: RegistryError) -> Self {
        Self::Validation(e.to_string())
    }
}
