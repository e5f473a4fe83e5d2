//! # vigil-config
//!
//! Layered configuration loading for Vigil using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VIGIL_*` prefix, `__` as separator)
//! 2. Project-level `.vigil/config.toml`
//! 3. User-level `~/.config/vigil/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `VIGIL_ORACLE__API_KEY` -> `oracle.api_key`,
//! `VIGIL_ANALYSIS__MAX_THIRD_PARTY` -> `analysis.max_third_party`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use vigil_config::VigilConfig;
//!
//! let config = VigilConfig::load_with_dotenv().expect("config");
//! if config.oracle.is_configured() {
//!     println!("Oracle model: {}", config.oracle.model);
//! }
//! ```

mod analysis;
mod error;
mod oracle;
mod registry;
mod renderer;
mod sessions;
mod storage;

pub use analysis::AnalysisConfig;
pub use error::ConfigError;
pub use oracle::OracleConfig;
pub use registry::{RegistryConfig, ServiceEntry};
pub use renderer::RendererConfig;
pub use sessions::SessionsConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local configuration directory name.
pub const PROJECT_DIR: &str = ".vigil";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VigilConfig {
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl VigilConfig {
    /// Load configuration from all sources (TOML files + environment variables),
    /// using the current directory as the project root.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration with `project_root/.vigil/config.toml` as the project layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_from(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain rooted at the current directory.
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain rooted at `project_root`.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("VIGIL_").split("__"))
    }

    /// Reject values that would disable a bound the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.analysis.max_third_party == 0, "analysis.max_third_party"),
            (
                self.analysis.context_max_scripts == 0,
                "analysis.context_max_scripts",
            ),
            (self.oracle.timeout_secs == 0, "oracle.timeout_secs"),
            (self.renderer.timeout_secs == 0, "renderer.timeout_secs"),
            (self.sessions.idle_secs == 0, "sessions.idle_secs"),
        ];
        if let Some((_, field)) = checks.iter().find(|(bad, _)| *bad) {
            return Err(ConfigError::InvalidValue {
                field: (*field).to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(entry) = self
            .registry
            .services
            .iter()
            .find(|entry| entry.domain.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "registry.services.domain".to_string(),
                reason: format!("entry '{}' has an empty domain", entry.name),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vigil").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = VigilConfig::default();
        assert!(!config.oracle.is_configured());
        assert!(!config.renderer.is_configured());
        assert!(!config.storage.retention_enabled());
        assert!(config.registry.services.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = VigilConfig::figment_for(Path::new("/nonexistent-vigil-root"));
        let config: VigilConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.analysis.max_third_party, 10);
        assert_eq!(config.analysis.context_max_scripts, 10);
        assert_eq!(config.storage.db_path, ".vigil/vigil.db");
    }

    #[test]
    fn zero_batch_bound_is_rejected() {
        let mut config = VigilConfig::default();
        config.analysis.max_third_party = 0;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "analysis.max_third_party")
        );
    }
}
