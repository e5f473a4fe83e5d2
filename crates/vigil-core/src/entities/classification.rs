use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::AnalysisRecord;
use crate::enums::{Recommendation, RiskLevel};

/// The JSON object the oracle is asked to return for an unknown script.
///
/// Unknown fields are rejected so a structurally wrong payload fails schema
/// validation instead of being silently accepted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassificationPayload {
    #[schemars(length(min = 1))]
    pub script_name: String,
    pub purpose: String,
    pub data_collected: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<String>,
    pub risk_level: RiskLevel,
    pub reasoning: String,
    pub recommendation: Recommendation,
    pub user_friendly_explanation: String,
}

impl ClassificationPayload {
    /// Bind the payload to the script it describes.
    ///
    /// When the oracle names no destinations, the script's own host is used.
    #[must_use]
    pub fn into_record(self, script_url: &str, script_host: &str) -> AnalysisRecord {
        let destinations = if self.destinations.is_empty() && !script_host.is_empty() {
            vec![script_host.to_string()]
        } else {
            self.destinations
        };
        AnalysisRecord {
            script_url: script_url.to_string(),
            script_name: self.script_name,
            purpose: self.purpose,
            data_collected: self.data_collected,
            destinations,
            risk_level: self.risk_level,
            reasoning: self.reasoning,
            recommendation: self.recommendation,
            user_friendly_explanation: self.user_friendly_explanation,
        }
    }
}
