//! In-process fakes of the oracle and renderer.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use vigil_config::VigilConfig;
use vigil_core::entities::ScriptRecord;
use vigil_db::VigilDb;
use vigil_engine::{RenderError, RenderedPage, Renderer, Vigil};
use vigil_oracle::{Oracle, OracleError, OracleRequest};

pub enum Mode {
    Reply(String),
    Fail,
    Hang,
}

/// Scripted oracle that counts calls and keeps every request.
pub struct FakeOracle {
    mode: Mode,
    calls: AtomicUsize,
    pub requests: Mutex<Vec<OracleRequest>>,
}

impl FakeOracle {
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Mode::Reply(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Oracle for FakeOracle {
    async fn generate(&self, request: OracleRequest) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        match &self.mode {
            Mode::Reply(text) => Ok(text.clone()),
            Mode::Fail => Err(OracleError::Api {
                status: 500,
                message: "upstream exploded".into(),
            }),
            Mode::Hang => std::future::pending().await,
        }
    }
}

/// Renderer returning a fixed page, or failing.
pub struct FakeRenderer {
    pub page: Option<RenderedPage>,
    pub calls: AtomicUsize,
}

impl FakeRenderer {
    pub fn page(page_host: &str, urls: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            page: Some(RenderedPage {
                scripts: urls.iter().map(|u| ScriptRecord::new(*u)).collect(),
                page_host: page_host.to_string(),
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn timing_out() -> Arc<Self> {
        Arc::new(Self {
            page: None,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render(&self, _url: &str) -> Result<RenderedPage, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.page
            .clone()
            .ok_or_else(|| RenderError::LoadTimeout("all load strategies timed out".into()))
    }
}

pub const EVIL_TRACKER_REPLY: &str = r#"Here you go:
```json
{"scriptName":"Evil Tracker","purpose":"Cross-site visitor tracking","dataCollected":["cookies","device fingerprint"],"riskLevel":"HIGH","reasoning":"Unknown vendor fingerprinting visitors.","recommendation":"BLOCK","userFriendlyExplanation":"It follows you across websites."}
```"#;

pub fn test_config() -> VigilConfig {
    let mut config = VigilConfig::default();
    config.oracle.timeout_secs = 1;
    config
}

pub async fn vigil_with(
    config: &VigilConfig,
    renderer: Arc<dyn Renderer>,
    oracle: Option<Arc<dyn Oracle>>,
) -> Vigil {
    let db = Arc::new(VigilDb::open_local(":memory:").await.unwrap());
    Vigil::new(config, db, renderer, oracle).unwrap()
}
