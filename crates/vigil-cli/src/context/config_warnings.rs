use vigil_config::VigilConfig;

/// Warn about configuration gaps that silently degrade results.
pub fn warn_unconfigured(config: &VigilConfig) {
    if !config.oracle.is_configured() {
        tracing::warn!(
            "oracle not configured (VIGIL_ORACLE__API_KEY unset): unknown scripts get the fallback verdict and chat answers are degraded"
        );
    }
    if !config.renderer.is_configured() {
        tracing::debug!("renderer endpoint not configured; `vgl analyze` needs --scripts");
    }
}
