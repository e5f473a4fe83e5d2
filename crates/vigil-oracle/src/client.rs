//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vigil_config::OracleConfig;

use crate::http::check_response;
use crate::{Oracle, OracleError, OracleRequest};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP oracle talking to `{base_url}/v1/chat/completions`.
pub struct HttpOracle {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpOracle {
    /// Build a client from the `[oracle]` config section.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &OracleConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("vigil/0.1")
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn body<'a>(&'a self, request: &'a OracleRequest) -> CompletionRequest<'a> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &request.system_prompt,
        });
        messages.extend(request.messages.iter().map(|m| WireMessage {
            role: match m.role {
                crate::OracleRole::User => "user",
                crate::OracleRole::Assistant => "assistant",
            },
            content: &m.content,
        }));
        CompletionRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

fn first_choice_text(response: CompletionResponse) -> Result<String, OracleError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(OracleError::EmptyResponse)
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn generate(&self, request: OracleRequest) -> Result<String, OracleError> {
        if self.api_key.is_empty() {
            return Err(OracleError::NotConfigured);
        }
        tracing::debug!(model = %self.model, turns = request.messages.len(), "oracle request");
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.body(&request))
            .send()
            .await?;
        let data: CompletionResponse = check_response(resp).await?.json().await?;
        first_choice_text(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OracleMessage;
    use pretty_assertions::assert_eq;

    fn oracle() -> HttpOracle {
        HttpOracle::new(&OracleConfig {
            base_url: "http://localhost:8080/".into(),
            api_key: "sk-test".into(),
            ..OracleConfig::default()
        })
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        assert_eq!(oracle().endpoint, "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn body_puts_system_prompt_first() {
        let oracle = oracle();
        let request = OracleRequest {
            system_prompt: "be brief".into(),
            messages: vec![OracleMessage::user("hi")],
            temperature: 0.2,
            max_tokens: 50,
        };
        let value = serde_json::to_value(oracle.body(&request)).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "be brief");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["max_tokens"], 50);
    }

    #[test]
    fn parses_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let data: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_choice_text(data).unwrap(), "hello");
    }

    #[test]
    fn blank_or_missing_content_is_empty_response() {
        for raw in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
        ] {
            let data: CompletionResponse = serde_json::from_str(raw).unwrap();
            assert!(matches!(
                first_choice_text(data),
                Err(OracleError::EmptyResponse)
            ));
        }
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        let oracle = HttpOracle::new(&OracleConfig::default());
        let request = OracleRequest {
            system_prompt: String::new(),
            messages: vec![],
            temperature: 0.0,
            max_tokens: 1,
        };
        assert!(matches!(
            oracle.generate(request).await,
            Err(OracleError::NotConfigured)
        ));
    }
}
