//! Local storage configuration.

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    String::from(".vigil/vigil.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// libSQL database file (`:memory:` for an ephemeral store).
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Age in days after which stored analyses may be pruned. `0` keeps everything.
    #[serde(default)]
    pub retention_days: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            retention_days: 0,
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub const fn retention_enabled(&self) -> bool {
        self.retention_days > 0
    }
}
