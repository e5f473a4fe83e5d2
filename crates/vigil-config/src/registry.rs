//! Extra known-service entries supplied by the operator.

use serde::{Deserialize, Serialize};
use vigil_core::enums::{Recommendation, RiskLevel};

/// One operator-supplied registry entry, appended after the built-ins.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Domain suffix, e.g. `cdn.example-analytics.com`.
    pub domain: String,
    pub name: String,
    pub purpose: String,
    #[serde(default)]
    pub data_collected: Vec<String>,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}
