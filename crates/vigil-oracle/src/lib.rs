//! # vigil-oracle
//!
//! Language-model oracle for Vigil.
//!
//! The [`Oracle`] trait is the consumed contract: one text-generation call
//! taking a system prompt, conversation turns, a temperature and a token
//! limit. [`HttpOracle`] implements it against an OpenAI-compatible
//! chat-completions endpoint.
//!
//! [`OracleAdapter`] wraps the two calls the pipeline makes (unknown-script
//! classification and chat answers) with prompt construction, a per-call
//! timeout, and strict parsing of the classification payload.

mod adapter;
mod client;
mod error;
mod extract;
mod http;
pub mod prompt;

pub use adapter::{CHAT_APOLOGY, OracleAdapter};
pub use client::HttpOracle;
pub use error::OracleError;
pub use extract::{first_json_object, parse_classification};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vigil_core::entities::ChatMessage;
use vigil_core::enums::ChatRole;

// ── Types ──────────────────────────────────────────────────────────

/// Speaker of a conversation turn sent to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleRole {
    User,
    Assistant,
}

impl From<ChatRole> for OracleRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => Self::User,
            ChatRole::Assistant => Self::Assistant,
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleMessage {
    pub role: OracleRole,
    pub content: String,
}

impl OracleMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: OracleRole::User,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for OracleMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.into(),
            content: message.content.clone(),
        }
    }
}

/// A single `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRequest {
    pub system_prompt: String,
    pub messages: Vec<OracleMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

// ── Contract ───────────────────────────────────────────────────────

/// External text-generation service.
///
/// Implementations return the raw reply text. Callers must tolerate
/// non-JSON, truncated, or otherwise malformed text.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Generate a reply for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] on transport, API, or empty-reply failures.
    async fn generate(&self, request: OracleRequest) -> Result<String, OracleError>;
}
