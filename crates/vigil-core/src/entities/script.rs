use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A script request observed by the page renderer. Input-only.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRecord {
    pub url: String,
    pub discovered_at: DateTime<Utc>,
}

impl ScriptRecord {
    /// Record a script discovered now.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            discovered_at: Utc::now(),
        }
    }
}
