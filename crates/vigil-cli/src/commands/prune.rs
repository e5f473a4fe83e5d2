use crate::cli::GlobalFlags;
use crate::cli::root_commands::PruneArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vgl prune`.
pub async fn handle(
    args: &PruneArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let days = cutoff_days(args.older_than_days, ctx.config.storage.retention_days)?;
    let service = ctx.service()?;
    let response = service.prune(chrono::Duration::days(i64::from(days))).await?;
    tracing::info!(
        deleted = response.deleted,
        cutoff = %response.cutoff,
        "pruned analysis log"
    );
    output(&response, flags.format)
}

/// `--older-than-days` wins over configured retention; zero means no cutoff.
fn cutoff_days(explicit: Option<u32>, retention_days: u32) -> anyhow::Result<u32> {
    match explicit.unwrap_or(retention_days) {
        0 => anyhow::bail!(
            "no retention configured: pass --older-than-days or set storage.retention_days"
        ),
        days => Ok(days),
    }
}

#[cfg(test)]
mod tests {
    use super::cutoff_days;

    #[test]
    fn explicit_days_override_retention() {
        assert_eq!(cutoff_days(Some(7), 30).unwrap(), 7);
    }

    #[test]
    fn retention_used_when_flag_missing() {
        assert_eq!(cutoff_days(None, 30).unwrap(), 30);
    }

    #[test]
    fn zero_is_rejected() {
        assert!(cutoff_days(None, 0).is_err());
        assert!(cutoff_days(Some(0), 30).is_err());
    }
}
