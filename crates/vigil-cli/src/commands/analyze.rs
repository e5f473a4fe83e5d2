use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use vigil_core::entities::{AnalysisRecord, AnalysisResult};
use vigil_engine::StaticRenderer;

use crate::cli::root_commands::AnalyzeArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::scripts::read_script_list;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    /// Log key, absent when storing failed.
    key: Option<String>,
    #[serde(flatten)]
    result: AnalysisResult,
}

/// One line per analyzed script in table mode.
#[derive(Debug, Serialize)]
struct VerdictRow<'a> {
    script: &'a str,
    risk: &'a str,
    recommendation: &'a str,
    url: &'a str,
}

impl<'a> From<&'a AnalysisRecord> for VerdictRow<'a> {
    fn from(record: &'a AnalysisRecord) -> Self {
        Self {
            script: &record.script_name,
            risk: record.risk_level.as_str(),
            recommendation: record.recommendation.as_str(),
            url: &record.script_url,
        }
    }
}

/// Handle `vgl analyze`.
pub async fn handle(
    args: &AnalyzeArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let (service, message) = match &args.scripts {
        Some(path) => {
            let urls = read_script_list(Path::new(path))?;
            let message = format!("Classifying {} scripts from {path}", urls.len());
            (
                ctx.service_with(Arc::new(StaticRenderer::from_urls(urls)))?,
                message,
            )
        }
        None => (ctx.service()?, format!("Analyzing {}", args.url)),
    };
    let progress = Progress::spinner(&message);

    let (result, key) = match service.analyze_and_store(&args.url).await {
        Ok(done) => done,
        Err(error) => {
            progress.finish_err("analysis failed");
            return Err(error.into());
        }
    };
    progress.finish_clear();

    tracing::info!(
        page = %result.url,
        total = result.total_scripts,
        third_party = result.third_party_script_count,
        analyzed = result.analyses.len(),
        "analysis complete"
    );
    if result.truncated_count() > 0 && !flags.quiet {
        eprintln!(
            "note: {} third-party scripts exceeded the analysis limit and were not classified",
            result.truncated_count()
        );
    }

    if flags.format == OutputFormat::Table {
        let rows: Vec<VerdictRow<'_>> = result.analyses.iter().map(VerdictRow::from).collect();
        return output(&rows, flags.format);
    }
    output(&AnalyzeResponse { key, result }, flags.format)
}
