use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ScriptRecord;
use crate::enums::{Recommendation, RiskLevel};

/// Verdict for one analyzed script. Created once by the resolver, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub script_url: String,
    pub script_name: String,
    pub purpose: String,
    pub data_collected: Vec<String>,
    pub destinations: Vec<String>,
    pub risk_level: RiskLevel,
    pub reasoning: String,
    pub recommendation: Recommendation,
    pub user_friendly_explanation: String,
}

/// Result of one `analyze` request.
///
/// `analyses[i]` corresponds to `scripts[i]`: both cover only the processed
/// third-party subset (the first K in discovery order). `total_scripts` and
/// `third_party_script_count` count the full renderer output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub total_scripts: u32,
    pub third_party_script_count: u32,
    pub scripts: Vec<ScriptRecord>,
    pub analyses: Vec<AnalysisRecord>,
}

impl AnalysisResult {
    /// Number of third-party scripts left out of `analyses` by the batch bound.
    #[must_use]
    pub fn truncated_count(&self) -> u32 {
        let processed = u32::try_from(self.analyses.len()).unwrap_or(u32::MAX);
        self.third_party_script_count.saturating_sub(processed)
    }

    /// Highest risk level among the analyses, if any were produced.
    #[must_use]
    pub fn highest_risk(&self) -> Option<RiskLevel> {
        self.analyses.iter().map(|a| a.risk_level).max()
    }
}

/// An `AnalysisResult` as it sits in the append-only log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    /// `analysis:<url>:<timestamp>`
    pub key: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub result: AnalysisResult,
}
