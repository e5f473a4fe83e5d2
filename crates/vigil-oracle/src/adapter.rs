//! The two oracle calls the pipeline makes.

use std::sync::Arc;
use std::time::Duration;

use vigil_config::OracleConfig;
use vigil_core::entities::{AnalysisRecord, ChatMessage};
use vigil_schema::SchemaRegistry;

use crate::extract::parse_classification;
use crate::prompt::{CLASSIFICATION_SYSTEM_PROMPT, chat_system_prompt, classification_prompt};
use crate::{Oracle, OracleError, OracleMessage, OracleRequest};

/// Reply returned by [`OracleAdapter::chat`] whenever the oracle fails.
pub const CHAT_APOLOGY: &str =
    "Sorry, I couldn't answer that right now. Please try again in a moment.";

/// Prompt construction, timeout, and parsing around an [`Oracle`].
#[derive(Clone)]
pub struct OracleAdapter {
    oracle: Arc<dyn Oracle>,
    schemas: Arc<SchemaRegistry>,
    timeout: Duration,
    classify_temperature: f32,
    classify_max_tokens: u32,
    chat_temperature: f32,
    chat_max_tokens: u32,
}

impl OracleAdapter {
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>, config: &OracleConfig) -> Self {
        Self {
            oracle,
            schemas: Arc::new(SchemaRegistry::new()),
            timeout: Duration::from_secs(config.timeout_secs),
            classify_temperature: config.classify_temperature,
            classify_max_tokens: config.classify_max_tokens,
            chat_temperature: config.chat_temperature,
            chat_max_tokens: config.chat_max_tokens,
        }
    }

    /// Share an already-built schema registry.
    #[must_use]
    pub fn with_schemas(mut self, schemas: Arc<SchemaRegistry>) -> Self {
        self.schemas = schemas;
        self
    }

    /// Override the per-call bound.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call(&self, request: OracleRequest) -> Result<String, OracleError> {
        tokio::time::timeout(self.timeout, self.oracle.generate(request))
            .await
            .map_err(|_| OracleError::Timeout {
                millis: self.timeout.as_millis(),
            })?
    }

    /// Ask the oracle to classify an unknown script.
    ///
    /// # Errors
    ///
    /// Any call, timeout, extraction, schema, or decode failure. The resolver
    /// turns every one of them into the unrecognized-script record.
    pub async fn classify(
        &self,
        script_url: &str,
        script_host: &str,
    ) -> Result<AnalysisRecord, OracleError> {
        let request = OracleRequest {
            system_prompt: CLASSIFICATION_SYSTEM_PROMPT.to_string(),
            messages: vec![OracleMessage::user(classification_prompt(
                script_url,
                script_host,
            ))],
            temperature: self.classify_temperature,
            max_tokens: self.classify_max_tokens,
        };
        let text = self.call(request).await?;
        let payload = parse_classification(&text, &self.schemas)?;
        Ok(payload.into_record(script_url, script_host))
    }

    /// Answer `message` about `context`, continuing `history`.
    ///
    /// Never fails: any oracle error is logged and replaced by
    /// [`CHAT_APOLOGY`].
    pub async fn chat(&self, context: &str, history: &[ChatMessage], message: &str) -> String {
        let mut messages: Vec<OracleMessage> = history.iter().map(OracleMessage::from).collect();
        messages.push(OracleMessage::user(message));
        let request = OracleRequest {
            system_prompt: chat_system_prompt(context),
            messages,
            temperature: self.chat_temperature,
            max_tokens: self.chat_max_tokens,
        };
        match self.call(request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!(error = %OracleError::EmptyResponse, "chat answer degraded");
                CHAT_APOLOGY.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat answer degraded");
                CHAT_APOLOGY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OracleRole;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use vigil_core::enums::{Recommendation, RiskLevel};

    /// Replies with a fixed script and records every request.
    struct Scripted {
        reply: Result<String, ()>,
        seen: Mutex<Vec<OracleRequest>>,
    }

    impl Scripted {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Oracle for Scripted {
        async fn generate(&self, request: OracleRequest) -> Result<String, OracleError> {
            self.seen.lock().unwrap().push(request);
            self.reply.clone().map_err(|()| OracleError::Api {
                status: 500,
                message: "boom".into(),
            })
        }
    }

    struct Hanging;

    #[async_trait]
    impl Oracle for Hanging {
        async fn generate(&self, _request: OracleRequest) -> Result<String, OracleError> {
            std::future::pending().await
        }
    }

    fn adapter(oracle: Arc<dyn Oracle>) -> OracleAdapter {
        OracleAdapter::new(oracle, &OracleConfig::default())
    }

    const REPLY: &str = r#"Sure! {"scriptName":"Evil Tracker","purpose":"Fingerprinting","dataCollected":["device fingerprint"],"riskLevel":"HIGH","reasoning":"Unknown vendor.","recommendation":"BLOCK","userFriendlyExplanation":"It follows you."}"#;

    #[tokio::test]
    async fn classify_builds_record_from_reply() {
        let oracle = Scripted::ok(REPLY);
        let record = adapter(oracle.clone())
            .classify("https://evil-tracker.io/x.js", "evil-tracker.io")
            .await
            .unwrap();
        assert_eq!(record.script_name, "Evil Tracker");
        assert_eq!(record.risk_level, RiskLevel::High);
        assert_eq!(record.recommendation, Recommendation::Block);
        assert_eq!(record.destinations, vec!["evil-tracker.io"]);

        let seen = oracle.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system_prompt, CLASSIFICATION_SYSTEM_PROMPT);
        assert!(seen[0].messages[0].content.contains("evil-tracker.io/x.js"));
        assert_eq!(seen[0].max_tokens, 600);
    }

    #[tokio::test]
    async fn classify_surfaces_parse_failures() {
        let err = adapter(Scripted::ok("I cannot help with that."))
            .classify("https://x.io/a.js", "x.io")
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::NoJson));
    }

    #[tokio::test]
    async fn classify_times_out() {
        let err = adapter(Arc::new(Hanging))
            .with_timeout(Duration::from_millis(20))
            .classify("https://x.io/a.js", "x.io")
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::Timeout { millis: 20 }));
    }

    #[tokio::test]
    async fn chat_forwards_history_then_message() {
        let oracle = Scripted::ok("  Evil Tracker is the riskiest.  ");
        let history = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        let reply = adapter(oracle.clone())
            .chat("Page: https://shop.example.com/", &history, "Which is riskiest?")
            .await;
        assert_eq!(reply, "Evil Tracker is the riskiest.");

        let seen = oracle.seen.lock().unwrap();
        let roles: Vec<OracleRole> = seen[0].messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [OracleRole::User, OracleRole::Assistant, OracleRole::User]
        );
        assert_eq!(seen[0].messages[2].content, "Which is riskiest?");
        assert!(seen[0].system_prompt.contains("shop.example.com"));
        assert_eq!(seen[0].max_tokens, 400);
    }

    #[tokio::test]
    async fn chat_failures_become_apology() {
        let reply = adapter(Scripted::failing()).chat("ctx", &[], "hi").await;
        assert_eq!(reply, CHAT_APOLOGY);

        let reply = adapter(Scripted::ok("   ")).chat("ctx", &[], "hi").await;
        assert_eq!(reply, CHAT_APOLOGY);

        let reply = adapter(Arc::new(Hanging))
            .with_timeout(Duration::from_millis(20))
            .chat("ctx", &[], "hi")
            .await;
        assert_eq!(reply, CHAT_APOLOGY);
    }
}
