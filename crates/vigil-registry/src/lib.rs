//! # vigil-registry
//!
//! Known third-party service registry for Vigil.
//!
//! An explicit, ordered list of `(domain suffix, template)` pairs. A script
//! host matches an entry when it equals the key or ends with `.` + key, so
//! `js.stripe.com` matches `stripe.com` while `stripe.com.evil.io` does not.
//! When several keys match, the longest key wins; identical keys resolve to
//! the earliest entry. Lookup never depends on map iteration order.
//!
//! Matching is deliberately stricter than a substring test: a host that
//! merely contains a key (`stripe.com.cdn-edge.net`) is not a registry hit
//! and goes on to the oracle. Do not relax this back to `contains`.

pub mod builtin;

mod error;

pub use error::RegistryError;

use serde::{Deserialize, Serialize};
use vigil_config::ServiceEntry;
use vigil_core::entities::AnalysisRecord;
use vigil_core::enums::{Recommendation, RiskLevel};

// ── Types ──────────────────────────────────────────────────────────

/// Partial verdict merged into an `AnalysisRecord` on a registry hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTemplate {
    pub name: String,
    pub purpose: String,
    pub data_collected: Vec<String>,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
}

/// One registry row: a normalized domain suffix and its template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub domain: String,
    pub template: ServiceTemplate,
}

impl RegistryEntry {
    /// Whether `host` is `domain` or one of its subdomains.
    ///
    /// `host` must already be lowercase.
    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        host == self.domain
            || host
                .strip_suffix(self.domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Merge this template into a full record for `script_url`.
    #[must_use]
    pub fn to_record(&self, script_url: &str, script_host: &str) -> AnalysisRecord {
        let t = &self.template;
        AnalysisRecord {
            script_url: script_url.to_string(),
            script_name: t.name.clone(),
            purpose: t.purpose.clone(),
            data_collected: t.data_collected.clone(),
            destinations: vec![script_host.to_string()],
            risk_level: t.risk_level,
            reasoning: format!(
                "Recognized {} ({}), a known third-party service.",
                t.name, self.domain
            ),
            recommendation: t.recommendation,
            user_friendly_explanation: format!("This script is {}: {}.", t.name, t.purpose),
        }
    }
}

// ── Registry ───────────────────────────────────────────────────────

/// Ordered domain-suffix → template table.
#[derive(Debug, Clone, Default)]
pub struct KnownServiceRegistry {
    entries: Vec<RegistryEntry>,
}

impl KnownServiceRegistry {
    /// Registry with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry seeded with the built-in service table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: builtin::entries(),
        }
    }

    /// Built-ins followed by operator-supplied entries from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidDomain`] for the first unusable key.
    pub fn with_config(services: &[ServiceEntry]) -> Result<Self, RegistryError> {
        let mut registry = Self::builtin();
        for service in services {
            registry.push(
                &service.domain,
                ServiceTemplate {
                    name: service.name.clone(),
                    purpose: service.purpose.clone(),
                    data_collected: service.data_collected.clone(),
                    risk_level: service.risk_level,
                    recommendation: service.recommendation,
                },
            )?;
        }
        Ok(registry)
    }

    /// Append an entry after all existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidDomain`] if `domain` is empty or is not
    /// a bare host suffix.
    pub fn push(&mut self, domain: &str, template: ServiceTemplate) -> Result<(), RegistryError> {
        let domain = normalize_domain(domain)?;
        tracing::debug!(%domain, name = %template.name, "registry entry added");
        self.entries.push(RegistryEntry { domain, template });
        Ok(())
    }

    /// Find the entry for `host`: longest matching key, earliest on ties.
    #[must_use]
    pub fn lookup(&self, host: &str) -> Option<&RegistryEntry> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        let mut best: Option<&RegistryEntry> = None;
        for entry in self.entries.iter().filter(|e| e.matches(&host)) {
            if best.is_none_or(|b| entry.domain.len() > b.domain.len()) {
                best = Some(entry);
            }
        }
        best
    }

    /// Entries in evaluation order.
    #[must_use]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_domain(raw: &str) -> Result<String, RegistryError> {
    let domain = raw.trim().trim_matches('.').to_ascii_lowercase();
    let reject = |reason| RegistryError::InvalidDomain {
        domain: raw.to_string(),
        reason,
    };
    if domain.is_empty() {
        return Err(reject("empty"));
    }
    if domain.contains("://") || domain.contains('/') {
        return Err(reject("expected a host suffix, not a URL"));
    }
    if domain.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(reject("contains whitespace or a port"));
    }
    Ok(domain)
}
