//! Batch orchestration over a page's script list.

use vigil_core::entities::{AnalysisRecord, AnalysisResult, ScriptRecord};

use crate::host::{host_of, is_first_party, normalize_host};
use crate::resolver::{Resolver, fallback_record};

/// Scripts split by the first-party rule. Malformed URLs land in neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub first_party: Vec<ScriptRecord>,
    pub third_party: Vec<ScriptRecord>,
    pub malformed: usize,
}

/// Split `scripts` into first- and third-party, keeping discovery order.
#[must_use]
pub fn partition(scripts: &[ScriptRecord], page_host: &str) -> Partition {
    let page_host = normalize_host(page_host);
    let mut out = Partition::default();
    for script in scripts {
        match host_of(&script.url) {
            Some(host) if is_first_party(&host, &page_host) => out.first_party.push(script.clone()),
            Some(_) => out.third_party.push(script.clone()),
            None => out.malformed += 1,
        }
    }
    out
}

/// Filters, bounds, and fans out resolution for one page.
#[derive(Clone)]
pub struct BatchOrchestrator {
    resolver: Resolver,
    max_third_party: usize,
}

impl BatchOrchestrator {
    #[must_use]
    pub const fn new(resolver: Resolver, max_third_party: usize) -> Self {
        Self {
            resolver,
            max_third_party,
        }
    }

    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Build the `AnalysisResult` for `page_url`.
    ///
    /// Only the first `max_third_party` third-party scripts are resolved;
    /// `third_party_script_count` still counts all of them. Resolutions run
    /// concurrently and are joined before returning, with `analyses[i]`
    /// matching `scripts[i]`.
    pub async fn run(
        &self,
        page_url: &str,
        scripts: &[ScriptRecord],
        page_host: &str,
    ) -> AnalysisResult {
        let Partition {
            first_party,
            mut third_party,
            malformed,
        } = partition(scripts, page_host);
        let third_party_count = third_party.len();
        third_party.truncate(self.max_third_party);

        tracing::info!(
            page = page_url,
            total = scripts.len(),
            first_party = first_party.len(),
            third_party = third_party_count,
            malformed,
            processing = third_party.len(),
            "classifying scripts"
        );

        let analyses = self.resolve_all(&third_party, page_host).await;
        AnalysisResult {
            url: page_url.to_string(),
            total_scripts: u32::try_from(scripts.len()).unwrap_or(u32::MAX),
            third_party_script_count: u32::try_from(third_party_count).unwrap_or(u32::MAX),
            scripts: third_party,
            analyses,
        }
    }

    async fn resolve_all(&self, scripts: &[ScriptRecord], page_host: &str) -> Vec<AnalysisRecord> {
        let mut set = tokio::task::JoinSet::new();
        for (idx, script) in scripts.iter().enumerate() {
            let resolver = self.resolver.clone();
            let url = script.url.clone();
            let page_host = page_host.to_string();
            set.spawn(async move { (idx, resolver.resolve(&url, &page_host).await.record) });
        }

        let mut slots: Vec<Option<AnalysisRecord>> = vec![None; scripts.len()];
        while let Some(res) = set.join_next().await {
            match res {
                Ok((idx, record)) => slots[idx] = Some(record),
                Err(e) => tracing::warn!(%e, "resolution task failed"),
            }
        }

        slots
            .into_iter()
            .zip(scripts)
            .map(|(slot, script)| {
                slot.unwrap_or_else(|| {
                    fallback_record(&script.url, host_of(&script.url).as_deref())
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scripts(urls: &[&str]) -> Vec<ScriptRecord> {
        urls.iter().map(|u| ScriptRecord::new(*u)).collect()
    }

    #[test]
    fn partition_keeps_order_and_drops_malformed() {
        let list = scripts(&[
            "https://shop.example.com/app.js",
            "https://www.googletagmanager.com/gtag/js",
            "not a url",
            "https://cdn.shop.example.com/vendor.js",
            "https://evil-tracker.io/x.js",
        ]);
        let parts = partition(&list, "shop.example.com");
        let urls = |v: &[ScriptRecord]| v.iter().map(|s| s.url.clone()).collect::<Vec<_>>();
        assert_eq!(
            urls(&parts.first_party),
            [
                "https://shop.example.com/app.js",
                "https://cdn.shop.example.com/vendor.js"
            ]
        );
        assert_eq!(
            urls(&parts.third_party),
            [
                "https://www.googletagmanager.com/gtag/js",
                "https://evil-tracker.io/x.js"
            ]
        );
        assert_eq!(parts.malformed, 1);
    }
}
