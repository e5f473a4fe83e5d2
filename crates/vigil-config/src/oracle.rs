//! Language-model oracle configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    String::from("https://api.openai.com")
}

fn default_model() -> String {
    String::from("gpt-4o-mini")
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_classify_temperature() -> f32 {
    0.2
}

const fn default_classify_max_tokens() -> u32 {
    600
}

const fn default_chat_temperature() -> f32 {
    0.5
}

const fn default_chat_max_tokens() -> u32 {
    400
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    /// OpenAI-compatible API root (the client appends `/v1/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the oracle API.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound for a single oracle call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_classify_temperature")]
    pub classify_temperature: f32,

    #[serde(default = "default_classify_max_tokens")]
    pub classify_max_tokens: u32,

    #[serde(default = "default_chat_temperature")]
    pub chat_temperature: f32,

    #[serde(default = "default_chat_max_tokens")]
    pub chat_max_tokens: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            classify_temperature: default_classify_temperature(),
            classify_max_tokens: default_classify_max_tokens(),
            chat_temperature: default_chat_temperature(),
            chat_max_tokens: default_chat_max_tokens(),
        }
    }
}

impl OracleConfig {
    /// Check if the oracle has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }
}
