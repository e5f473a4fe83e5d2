//! Classification resolver: one script URL in, one verdict out.
//!
//! Tiers are tried in strict order and the first match wins:
//!
//! 1. **First party**: the script host is the page host or a sub/parent
//!    domain of it (after stripping `www.`).
//! 2. **Framework**: the URL contains a bundler/runtime path marker.
//! 3. **Registry**: the longest matching known-service suffix.
//! 4. **Oracle**: the language model classifies the script.
//! 5. **Fallback**: the unrecognized-script record, used whenever the oracle
//!    is absent, fails, times out, or answers with an invalid payload, and
//!    for script URLs that do not parse.

use std::sync::Arc;

use vigil_core::entities::AnalysisRecord;
use vigil_core::enums::{Recommendation, ResolutionTier, RiskLevel};
use vigil_oracle::OracleAdapter;
use vigil_registry::KnownServiceRegistry;

use crate::host::{host_of, is_first_party, normalize_host};

/// Path markers of build chunks and runtimes emitted by common web frameworks.
pub const FRAMEWORK_MARKERS: &[&str] = &[
    "/_next/static/",
    "/_nuxt/",
    "/static/chunks/",
    "/static/js/main.",
    "/_app/immutable/",
    "/build/_shared/",
    "/@vite/client",
    "/assets/index-",
    "webpack",
    "/runtime.",
    "/polyfills.",
    "/vendor.",
];

pub const FALLBACK_SCRIPT_NAME: &str = "Unrecognized Third-Party Script";

/// A verdict plus the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub tier: ResolutionTier,
    pub record: AnalysisRecord,
}

fn destinations(host: Option<&str>) -> Vec<String> {
    host.map(|h| vec![h.to_string()]).unwrap_or_default()
}

/// Record for a script served by the page's own site.
#[must_use]
pub fn first_party_record(script_url: &str, host: &str) -> AnalysisRecord {
    AnalysisRecord {
        script_url: script_url.to_string(),
        script_name: "First-Party Script".to_string(),
        purpose: "Code served by the site itself".to_string(),
        data_collected: Vec::new(),
        destinations: destinations(Some(host)),
        risk_level: RiskLevel::Low,
        reasoning: "Same-origin asset.".to_string(),
        recommendation: Recommendation::Allow,
        user_friendly_explanation: "This script comes from the website you are visiting."
            .to_string(),
    }
}

/// Record for a bundler chunk or framework runtime.
#[must_use]
pub fn framework_record(script_url: &str, host: &str) -> AnalysisRecord {
    AnalysisRecord {
        script_url: script_url.to_string(),
        script_name: "Framework Asset".to_string(),
        purpose: "Build chunk or runtime of the site's web framework".to_string(),
        data_collected: Vec::new(),
        destinations: destinations(Some(host)),
        risk_level: RiskLevel::Low,
        reasoning: "Standard framework asset.".to_string(),
        recommendation: Recommendation::Allow,
        user_friendly_explanation: "This is part of the toolkit the site is built with."
            .to_string(),
    }
}

/// Conservative record for anything that could not be identified.
#[must_use]
pub fn fallback_record(script_url: &str, host: Option<&str>) -> AnalysisRecord {
    AnalysisRecord {
        script_url: script_url.to_string(),
        script_name: FALLBACK_SCRIPT_NAME.to_string(),
        purpose: "Unknown".to_string(),
        data_collected: Vec::new(),
        destinations: destinations(host),
        risk_level: RiskLevel::Medium,
        reasoning: "Unfamiliar domain, requires manual review.".to_string(),
        recommendation: Recommendation::Monitor,
        user_friendly_explanation:
            "We could not identify this script automatically, so it is worth keeping an eye on."
                .to_string(),
    }
}

fn has_framework_marker(script_url: &str) -> bool {
    let lower = script_url.to_ascii_lowercase();
    FRAMEWORK_MARKERS.iter().any(|m| lower.contains(m))
}

/// The tiered decision chain.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<KnownServiceRegistry>,
    oracle: Option<OracleAdapter>,
}

impl Resolver {
    /// `oracle = None` skips straight from the registry to the fallback.
    #[must_use]
    pub const fn new(registry: Arc<KnownServiceRegistry>, oracle: Option<OracleAdapter>) -> Self {
        Self { registry, oracle }
    }

    #[must_use]
    pub fn registry(&self) -> &KnownServiceRegistry {
        &self.registry
    }

    /// Resolve `script_url` found on a page served from `page_host`.
    pub async fn resolve(&self, script_url: &str, page_host: &str) -> Resolution {
        let resolution = self.resolve_inner(script_url, &normalize_host(page_host)).await;
        tracing::debug!(
            script = script_url,
            tier = resolution.tier.as_str(),
            risk = resolution.record.risk_level.as_str(),
            "script resolved"
        );
        resolution
    }

    async fn resolve_inner(&self, script_url: &str, page_host: &str) -> Resolution {
        let Some(host) = host_of(script_url) else {
            tracing::warn!(script = script_url, "unparseable script URL, using fallback");
            return Resolution {
                tier: ResolutionTier::Fallback,
                record: fallback_record(script_url, None),
            };
        };

        if is_first_party(&host, page_host) {
            return Resolution {
                tier: ResolutionTier::FirstParty,
                record: first_party_record(script_url, &host),
            };
        }
        if has_framework_marker(script_url) {
            return Resolution {
                tier: ResolutionTier::Framework,
                record: framework_record(script_url, &host),
            };
        }
        if let Some(entry) = self.registry.lookup(&host) {
            return Resolution {
                tier: ResolutionTier::Registry,
                record: entry.to_record(script_url, &host),
            };
        }

        let Some(oracle) = &self.oracle else {
            tracing::debug!(script = script_url, "no oracle configured, using fallback");
            return Resolution {
                tier: ResolutionTier::Fallback,
                record: fallback_record(script_url, Some(&host)),
            };
        };
        match oracle.classify(script_url, &host).await {
            Ok(record) => Resolution {
                tier: ResolutionTier::Oracle,
                record,
            },
            Err(e) => {
                tracing::warn!(script = script_url, error = %e, "classification degraded");
                Resolution {
                    tier: ResolutionTier::Fallback,
                    record: fallback_record(script_url, Some(&host)),
                }
            }
        }
    }
}
