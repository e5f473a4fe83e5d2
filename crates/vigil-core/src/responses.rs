//! Response types returned to calling layers.
//!
//! These structs define the JSON shapes of `chat`, `initChatSession`, and the
//! `vgl` commands built on them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AnalysisResult, ChatMessage, StoredAnalysis};

/// Response from `chat`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    pub timestamp: DateTime<Utc>,
}

/// Response from `initChatSession`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InitSessionResponse {
    pub success: bool,
}

/// Response from `getHistory`. Unknown sessions yield an empty history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub messages: Vec<ChatMessage>,
    pub analysis_data: Option<AnalysisResult>,
}

/// Summary row for `vgl analyses`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub key: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub total_scripts: u32,
    pub third_party_script_count: u32,
    pub analyzed: u32,
    pub highest_risk: Option<String>,
}

impl From<&StoredAnalysis> for AnalysisSummary {
    fn from(stored: &StoredAnalysis) -> Self {
        Self {
            key: stored.key.clone(),
            url: stored.url.clone(),
            created_at: stored.created_at,
            total_scripts: stored.result.total_scripts,
            third_party_script_count: stored.result.third_party_script_count,
            analyzed: u32::try_from(stored.result.analyses.len()).unwrap_or(u32::MAX),
            highest_risk: stored.result.highest_risk().map(|r| r.as_str().to_string()),
        }
    }
}

/// Response from `vgl prune`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PruneResponse {
    pub deleted: u64,
    pub cutoff: DateTime<Utc>,
}
