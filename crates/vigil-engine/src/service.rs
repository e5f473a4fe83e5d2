//! The `Vigil` facade: what calling layers invoke.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use url::Url;
use vigil_config::VigilConfig;
use vigil_core::entities::{AnalysisResult, ChatMessage, StoredAnalysis};
use vigil_core::responses::{ChatHistory, ChatReply, InitSessionResponse, PruneResponse};
use vigil_db::VigilDb;
use vigil_oracle::{CHAT_APOLOGY, Oracle, OracleAdapter};
use vigil_registry::KnownServiceRegistry;

use crate::batch::BatchOrchestrator;
use crate::context::ContextBuilder;
use crate::error::EngineError;
use crate::host::host_of;
use crate::render::Renderer;
use crate::resolver::{Resolution, Resolver};
use crate::session::{Responder, SessionStore, TurnInput};

/// Analysis pipeline plus chat sessions over one database.
pub struct Vigil {
    renderer: Arc<dyn Renderer>,
    batch: BatchOrchestrator,
    oracle: Option<OracleAdapter>,
    context: ContextBuilder,
    db: Arc<VigilDb>,
    sessions: SessionStore,
    retention_days: u32,
}

fn validate_page_url(url: &str) -> Result<String, EngineError> {
    let url = url.trim();
    let parsed =
        Url::parse(url).map_err(|e| EngineError::Validation(format!("invalid URL '{url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EngineError::Validation(format!(
            "unsupported scheme '{}' in '{url}', expected http or https",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(EngineError::Validation(format!("URL '{url}' has no host")));
    }
    Ok(url.to_string())
}

fn validate_session_id(session_id: &str) -> Result<(), EngineError> {
    if session_id.trim().is_empty() {
        return Err(EngineError::Validation(
            "session id must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl Vigil {
    /// Assemble the pipeline.
    ///
    /// `oracle = None` runs without a language model: unknown scripts get the
    /// fallback record and chat answers are the apology text.
    ///
    /// # Errors
    ///
    /// `EngineError::Validation` if a configured registry entry is unusable.
    pub fn new(
        config: &VigilConfig,
        db: Arc<VigilDb>,
        renderer: Arc<dyn Renderer>,
        oracle: Option<Arc<dyn Oracle>>,
    ) -> Result<Self, EngineError> {
        let registry = Arc::new(KnownServiceRegistry::with_config(
            &config.registry.services,
        )?);
        let oracle = oracle.map(|o| OracleAdapter::new(o, &config.oracle));
        let resolver = Resolver::new(registry, oracle.clone());
        Ok(Self {
            renderer,
            batch: BatchOrchestrator::new(resolver, config.analysis.max_third_party),
            oracle,
            context: ContextBuilder::new(config.analysis.context_max_scripts),
            sessions: SessionStore::new(
                Arc::clone(&db),
                Duration::from_secs(config.sessions.idle_secs),
                config.analysis.chat_history_window,
            ),
            db,
            retention_days: config.storage.retention_days,
        })
    }

    #[must_use]
    pub fn db(&self) -> &VigilDb {
        &self.db
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    // ── Analysis ───────────────────────────────────────────────────

    /// Render `url`, classify its third-party scripts, and log the result.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed URL, `Render` if the page cannot be
    /// loaded. Storage failures are logged and do not fail the call.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisResult, EngineError> {
        Ok(self.analyze_and_store(url).await?.0)
    }

    /// [`Self::analyze`], also returning the log key when storing succeeded.
    ///
    /// # Errors
    ///
    /// Same as [`Self::analyze`].
    pub async fn analyze_and_store(
        &self,
        url: &str,
    ) -> Result<(AnalysisResult, Option<String>), EngineError> {
        let url = validate_page_url(url)?;
        let page = self.renderer.render(&url).await?;
        let page_host = if page.page_host.trim().is_empty() {
            host_of(&url).unwrap_or_default()
        } else {
            page.page_host
        };

        let result = self.batch.run(&url, &page.scripts, &page_host).await;

        let key = match self.db.store_analysis(&result).await {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!(page = %url, error = %e, "failed to store analysis");
                None
            }
        };
        self.apply_retention().await;
        Ok((result, key))
    }

    /// Resolve a single script without rendering or storing anything.
    pub async fn classify(&self, script_url: &str, page_host: &str) -> Resolution {
        self.batch.resolver().resolve(script_url, page_host).await
    }

    /// Stored analyses, oldest first, optionally for one URL only.
    ///
    /// # Errors
    ///
    /// `Storage` if the log cannot be read.
    pub async fn list_analyses(
        &self,
        url: Option<&str>,
    ) -> Result<Vec<StoredAnalysis>, EngineError> {
        Ok(match url {
            Some(url) => self.db.analyses_for_url(url).await?,
            None => self.db.retrieve_analyses().await?,
        })
    }

    /// Most recent stored analysis of `url`.
    ///
    /// # Errors
    ///
    /// `Storage` if the log cannot be read.
    pub async fn latest_analysis_for(
        &self,
        url: &str,
    ) -> Result<Option<StoredAnalysis>, EngineError> {
        Ok(self.db.latest_analysis_for(url).await?)
    }

    /// Stored analysis under `key`.
    ///
    /// # Errors
    ///
    /// `Storage` if the log cannot be read.
    pub async fn get_analysis(&self, key: &str) -> Result<Option<StoredAnalysis>, EngineError> {
        Ok(self.db.get_analysis(key).await?)
    }

    /// Delete log entries older than `older_than`.
    ///
    /// # Errors
    ///
    /// `Storage` if the delete fails.
    pub async fn prune(&self, older_than: chrono::Duration) -> Result<PruneResponse, EngineError> {
        let cutoff = Utc::now() - older_than;
        let deleted = self.db.prune_analyses(cutoff).await?;
        Ok(PruneResponse { deleted, cutoff })
    }

    async fn apply_retention(&self) {
        if self.retention_days == 0 {
            return;
        }
        if let Err(e) = self
            .prune(chrono::Duration::days(i64::from(self.retention_days)))
            .await
        {
            tracing::warn!(error = %e, "retention prune failed");
        }
    }

    // ── Chat ───────────────────────────────────────────────────────

    /// Create or reset a chat session bound to `analysis_data`.
    ///
    /// Returns `success: false` when the session could not be stored.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty session id.
    pub async fn init_chat_session(
        &self,
        session_id: &str,
        analysis_data: Option<AnalysisResult>,
    ) -> Result<InitSessionResponse, EngineError> {
        validate_session_id(session_id)?;
        match self.sessions.init(session_id, analysis_data).await {
            Ok(()) => Ok(InitSessionResponse { success: true }),
            Err(EngineError::Storage(e)) => {
                tracing::warn!(session = session_id, error = %e, "chat session init not stored");
                Ok(InitSessionResponse { success: false })
            }
            Err(e) => Err(e),
        }
    }

    /// Answer `message` in `session_id`.
    ///
    /// The prompt context is `analysis_context` when given, otherwise the
    /// session's snapshot. Oracle failures yield the apology reply.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty message or id, `SessionNotFound` if the
    /// session was never initialized (the oracle is not called).
    pub async fn chat(
        &self,
        message: &str,
        session_id: &str,
        analysis_context: Option<AnalysisResult>,
    ) -> Result<ChatReply, EngineError> {
        validate_session_id(session_id)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(EngineError::Validation(
                "message must not be empty".to_string(),
            ));
        }

        let oracle = self.oracle.clone();
        let context = self.context;
        let responder: Responder = Box::new(move |input: TurnInput| {
            async move {
                let analysis = analysis_context.or(input.analysis);
                let text = context.build(analysis.as_ref());
                match oracle {
                    Some(oracle) => oracle.chat(&text, &input.history, &input.message).await,
                    None => {
                        tracing::warn!("no oracle configured, chat answer degraded");
                        CHAT_APOLOGY.to_string()
                    }
                }
            }
            .boxed()
        });
        self.sessions
            .turn(session_id, message.to_string(), responder)
            .await
    }

    /// Append a message without asking the oracle.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if the session was never initialized.
    pub async fn append_message(
        &self,
        session_id: &str,
        message: ChatMessage,
    ) -> Result<(), EngineError> {
        validate_session_id(session_id)?;
        self.sessions.append(session_id, message).await
    }

    /// Messages and snapshot of a session; empty for unknown sessions.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty id, `Storage` if the session cannot be read.
    pub async fn get_history(&self, session_id: &str) -> Result<ChatHistory, EngineError> {
        validate_session_id(session_id)?;
        self.sessions.history(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://shop.example.com/")]
    #[case("  http://localhost:8080/page  ")]
    fn accepts_http_urls(#[case] url: &str) {
        assert!(validate_page_url(url).is_ok());
    }

    #[rstest]
    #[case("shop.example.com")]
    #[case("ftp://shop.example.com/")]
    #[case("file:///etc/passwd")]
    #[case("")]
    fn rejects_other_urls(#[case] url: &str) {
        assert!(matches!(
            validate_page_url(url),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn empty_session_id_is_invalid() {
        assert!(validate_session_id("  ").is_err());
        assert!(validate_session_id("s-1").is_ok());
    }
}
