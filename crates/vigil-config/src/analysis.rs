//! Analysis pipeline bounds.

use serde::{Deserialize, Serialize};

/// Third-party scripts classified per analyze request.
const fn default_max_third_party() -> usize {
    10
}

/// Scripts summarized into a chat prompt.
const fn default_context_max_scripts() -> usize {
    10
}

/// Prior chat messages forwarded to the oracle.
const fn default_chat_history_window() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_max_third_party")]
    pub max_third_party: usize,

    #[serde(default = "default_context_max_scripts")]
    pub context_max_scripts: usize,

    #[serde(default = "default_chat_history_window")]
    pub chat_history_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_third_party: default_max_third_party(),
            context_max_scripts: default_context_max_scripts(),
            chat_history_window: default_chat_history_window(),
        }
    }
}
