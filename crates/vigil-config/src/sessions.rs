//! Chat session actor configuration.

use serde::{Deserialize, Serialize};

const fn default_idle_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionsConfig {
    /// Seconds an idle session actor stays resident before it is evicted.
    #[serde(default = "default_idle_secs")]
    pub idle_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_secs: default_idle_secs(),
        }
    }
}
