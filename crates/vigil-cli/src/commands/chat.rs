use anyhow::Context;
use vigil_core::entities::AnalysisResult;
use vigil_engine::{EngineError, Vigil};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ChatCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vgl chat`.
pub async fn handle(
    action: &ChatCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = ctx.service()?;
    match action {
        ChatCommands::Init {
            session_id,
            key,
            url,
        } => {
            let analysis = bound_analysis(&service, key.as_deref(), url.as_deref()).await?;
            let response = service.init_chat_session(session_id, analysis).await?;
            if !response.success {
                tracing::warn!(session = %session_id, "session was not stored");
            }
            output(&response, flags.format)
        }
        ChatCommands::Send {
            session_id,
            message,
        } => match service.chat(message, session_id, None).await {
            Ok(reply) => output(&reply, flags.format),
            Err(EngineError::SessionNotFound { session_id }) => Err(anyhow::anyhow!(
                "chat session '{session_id}' not found. Run 'vgl chat init {session_id}' first."
            )),
            Err(error) => Err(error.into()),
        },
        ChatCommands::History { session_id } => {
            let history = service.get_history(session_id).await?;
            output(&history, flags.format)
        }
    }
}

/// Resolve the analysis a new session is bound to.
async fn bound_analysis(
    service: &Vigil,
    key: Option<&str>,
    url: Option<&str>,
) -> anyhow::Result<Option<AnalysisResult>> {
    if let Some(key) = key {
        let stored = service
            .get_analysis(key)
            .await?
            .with_context(|| format!("no stored analysis with key '{key}'"))?;
        return Ok(Some(stored.result));
    }
    if let Some(url) = url {
        let stored = service
            .latest_analysis_for(url)
            .await?
            .with_context(|| {
                format!("no stored analysis for '{url}'. Run 'vgl analyze {url}' first.")
            })?;
        return Ok(Some(stored.result));
    }
    Ok(None)
}
