use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use vigil_config::VigilConfig;
use vigil_db::VigilDb;
use vigil_engine::{HttpRenderer, Renderer, Vigil};
use vigil_oracle::{HttpOracle, Oracle};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: VigilConfig,
    pub db: Arc<VigilDb>,
    pub oracle: Option<Arc<dyn Oracle>>,
}

impl AppContext {
    /// Open storage and build the oracle client for `project_root`.
    pub async fn init(project_root: &Path, config: VigilConfig) -> anyhow::Result<Self> {
        let db_path = resolve_db_path(project_root, &config.storage.db_path);
        let storage_dir = db_path
            .parent()
            .filter(|parent| db_path.as_os_str() != ":memory:" && !parent.as_os_str().is_empty());
        if let Some(parent) = storage_dir {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create storage directory {}", parent.display())
            })?;
        }

        let db = VigilDb::open_local(&db_path.to_string_lossy())
            .await
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;

        let oracle: Option<Arc<dyn Oracle>> = if config.oracle.is_configured() {
            Some(Arc::new(HttpOracle::new(&config.oracle)))
        } else {
            None
        };

        Ok(Self {
            config,
            db: Arc::new(db),
            oracle,
        })
    }

    /// Build the pipeline around `renderer`.
    pub fn service_with(&self, renderer: Arc<dyn Renderer>) -> anyhow::Result<Vigil> {
        Vigil::new(
            &self.config,
            Arc::clone(&self.db),
            renderer,
            self.oracle.clone(),
        )
        .context("failed to assemble the analysis pipeline")
    }

    /// Build the pipeline around the configured rendering service.
    pub fn service(&self) -> anyhow::Result<Vigil> {
        self.service_with(Arc::new(HttpRenderer::new(&self.config.renderer)))
    }
}

/// Relative database paths are anchored at the project root.
fn resolve_db_path(project_root: &Path, db_path: &str) -> PathBuf {
    if db_path == ":memory:" {
        return PathBuf::from(db_path);
    }
    let path = Path::new(db_path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::resolve_db_path;

    #[test]
    fn relative_db_path_is_anchored_at_project_root() {
        let path = resolve_db_path(Path::new("/work/site"), ".vigil/vigil.db");
        assert_eq!(path, Path::new("/work/site/.vigil/vigil.db"));
    }

    #[test]
    fn absolute_and_memory_paths_are_kept() {
        assert_eq!(
            resolve_db_path(Path::new("/work/site"), "/var/lib/vigil.db"),
            Path::new("/var/lib/vigil.db")
        );
        assert_eq!(
            resolve_db_path(Path::new("/work/site"), ":memory:"),
            Path::new(":memory:")
        );
    }

    #[tokio::test]
    async fn init_creates_storage_directory() {
        let temp = tempfile::TempDir::new().expect("tempdir should create");
        let config = vigil_config::VigilConfig::default();

        let ctx = super::AppContext::init(temp.path(), config)
            .await
            .expect("context should init");

        assert!(temp.path().join(".vigil").is_dir());
        assert!(ctx.oracle.is_none());
        assert!(ctx.service().is_ok());
    }
}
