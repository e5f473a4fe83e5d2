//! Page renderer contract and adapters.
//!
//! The renderer loads a page in a headless browser and reports the script
//! requests it issued. Vigil only consumes that output:
//! `render(url) -> {scripts, pageHost}` or `LoadTimeout` / `LoadBlocked`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vigil_config::RendererConfig;
use vigil_core::entities::ScriptRecord;

use crate::host::host_of;

/// Renderer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub scripts: Vec<ScriptRecord>,
    pub page_host: String,
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// No load strategy finished within the renderer's deadline.
    #[error("page load timed out: {0}")]
    LoadTimeout(String),

    /// The page refused to load (bot wall, network block, HTTP error).
    #[error("page load blocked: {0}")]
    LoadBlocked(String),

    /// The renderer service itself could not be reached.
    #[error("renderer unreachable: {0}")]
    Transport(String),

    /// The renderer answered with something other than a page report.
    #[error("invalid renderer response: {0}")]
    InvalidResponse(String),

    #[error("renderer is not configured (set renderer.endpoint or pass --scripts)")]
    NotConfigured,
}

/// Loads a page and lists the scripts it requested.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RenderError`] when the page cannot be loaded.
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError>;
}

// ── HTTP renderer ──────────────────────────────────────────────────

#[derive(Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireScript {
    url: String,
    #[serde(default)]
    discovered_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePage {
    scripts: Vec<WireScript>,
    #[serde(default)]
    page_host: String,
}

#[derive(Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

/// Client for an external rendering service.
///
/// Posts `{"url": ...}` to the endpoint and expects
/// `{"scripts": [{"url", "discoveredAt"?}], "pageHost"}`. Failures may be
/// reported as `{"error": "LOAD_TIMEOUT" | "LOAD_BLOCKED", "message"}`.
pub struct HttpRenderer {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRenderer {
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("vigil/0.1")
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            endpoint: config.endpoint.clone(),
        }
    }
}

fn page_from_wire(url: &str, page: WirePage) -> RenderedPage {
    let page_host = if page.page_host.trim().is_empty() {
        host_of(url).unwrap_or_default()
    } else {
        page.page_host
    };
    let now = Utc::now();
    RenderedPage {
        scripts: page
            .scripts
            .into_iter()
            .map(|s| ScriptRecord {
                url: s.url,
                discovered_at: s.discovered_at.unwrap_or(now),
            })
            .collect(),
        page_host,
    }
}

fn error_from_status(status: u16, body: &str) -> RenderError {
    if let Ok(wire) = serde_json::from_str::<WireError>(body) {
        match wire.error.as_str() {
            "LOAD_TIMEOUT" => return RenderError::LoadTimeout(wire.message),
            "LOAD_BLOCKED" => return RenderError::LoadBlocked(wire.message),
            _ => {}
        }
    }
    match status {
        408 | 504 => RenderError::LoadTimeout(body.to_string()),
        403 | 451 | 502 => RenderError::LoadBlocked(body.to_string()),
        _ => RenderError::Transport(format!("status {status}: {body}")),
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        if self.endpoint.is_empty() {
            return Err(RenderError::NotConfigured);
        }
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&RenderRequest { url })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RenderError::LoadTimeout(e.to_string())
                } else {
                    RenderError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RenderError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(error_from_status(status.as_u16(), &body));
        }
        let page: WirePage = serde_json::from_str(&body)
            .map_err(|e| RenderError::InvalidResponse(e.to_string()))?;
        Ok(page_from_wire(url, page))
    }
}

// ── Static renderer ────────────────────────────────────────────────

/// Serves a fixed script list for any URL. Used for offline analysis.
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    scripts: Vec<ScriptRecord>,
}

impl StaticRenderer {
    #[must_use]
    pub const fn new(scripts: Vec<ScriptRecord>) -> Self {
        Self { scripts }
    }

    #[must_use]
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(urls.into_iter().map(ScriptRecord::new).collect())
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let page_host =
            host_of(url).ok_or_else(|| RenderError::LoadBlocked(format!("no host in {url}")))?;
        Ok(RenderedPage {
            scripts: self.scripts.clone(),
            page_host,
        })
    }
}
