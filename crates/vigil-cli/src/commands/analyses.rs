use vigil_core::entities::StoredAnalysis;
use vigil_core::responses::AnalysisSummary;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalysesArgs;
use crate::context::AppContext;
use crate::output::output;

const DEFAULT_LIMIT: u32 = 50;

/// Handle `vgl analyses`: the most recent entries, oldest first.
pub async fn handle(
    args: &AnalysesArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let stored = service.list_analyses(args.url.as_deref()).await?;
    let limit = usize::try_from(flags.limit.unwrap_or(DEFAULT_LIMIT))?;
    output(&summarize(&stored, limit), flags.format)
}

/// Summaries of the last `limit` entries, keeping log order.
fn summarize(stored: &[StoredAnalysis], limit: usize) -> Vec<AnalysisSummary> {
    let skip = stored.len().saturating_sub(limit);
    stored[skip..].iter().map(AnalysisSummary::from).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use vigil_core::entities::{AnalysisResult, StoredAnalysis};

    use super::summarize;

    fn stored(n: i64) -> StoredAnalysis {
        let created_at = Utc.timestamp_millis_opt(1_700_000_000_000 + n).unwrap();
        StoredAnalysis {
            key: format!("analysis:https://a.io/:{}", 1_700_000_000_000 + n),
            url: "https://a.io/".into(),
            created_at,
            result: AnalysisResult {
                url: "https://a.io/".into(),
                total_scripts: 2,
                third_party_script_count: 1,
                scripts: vec![],
                analyses: vec![],
            },
        }
    }

    #[test]
    fn keeps_most_recent_entries_in_log_order() {
        let log: Vec<_> = (0..5).map(stored).collect();
        let rows = summarize(&log, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, log[3].key);
        assert_eq!(rows[1].key, log[4].key);
        assert_eq!(rows[1].analyzed, 0);
        assert_eq!(rows[1].highest_risk, None);
    }

    #[test]
    fn limit_larger_than_log_returns_everything() {
        let log: Vec<_> = (0..3).map(stored).collect();
        assert_eq!(summarize(&log, 50).len(), 3);
    }
}
