use serde::Serialize;
use vigil_core::entities::AnalysisRecord;
use vigil_core::enums::ResolutionTier;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ClassifyArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    tier: ResolutionTier,
    #[serde(flatten)]
    record: AnalysisRecord,
}

/// Handle `vgl classify`.
pub async fn handle(
    args: &ClassifyArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let resolution = service.classify(&args.script_url, &args.page_host).await;
    tracing::debug!(tier = %resolution.tier, script = %args.script_url, "classified");
    output(
        &ClassifyResponse {
            tier: resolution.tier,
            record: resolution.record,
        },
        flags.format,
    )
}
