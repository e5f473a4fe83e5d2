//! External page renderer configuration.

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    90
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RendererConfig {
    /// Rendering service endpoint. Receives `{"url": ...}` and answers
    /// `{"scripts": [...], "pageHost": ...}`.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RendererConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty()
    }
}
