//! Oracle error types.
//!
//! None of these cross the engine boundary: classification failures become
//! the fallback record and chat failures become the apology text.

use thiserror::Error;
use vigil_schema::SchemaError;

/// Errors that can occur when calling or parsing the oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The oracle API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the oracle.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The oracle returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The call did not complete within the configured bound.
    #[error("oracle call timed out after {millis}ms")]
    Timeout { millis: u128 },

    /// The oracle answered with no text.
    #[error("oracle returned an empty response")]
    EmptyResponse,

    /// No balanced `{...}` span was found in the reply.
    #[error("no JSON object found in oracle reply")]
    NoJson,

    /// The extracted span was not valid JSON or did not decode.
    #[error("failed to decode oracle payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload decoded but violated the classification schema.
    #[error("oracle payload rejected: {0}")]
    Schema(#[from] SchemaError),

    /// No API key or base URL is configured.
    #[error("oracle is not configured (set oracle.api_key)")]
    NotConfigured,
}
