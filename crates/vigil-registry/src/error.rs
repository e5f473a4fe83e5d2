//! Registry error types.

use thiserror::Error;

/// Errors that can occur when building the known-service registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A domain key is empty or is not a bare host suffix.
    #[error("invalid registry domain '{domain}': {reason}")]
    InvalidDomain {
        /// The rejected key as supplied.
        domain: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
