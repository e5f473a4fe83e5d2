//! Persisted key layout.
//!
//! ```text
//! analysis:<url>:<timestamp-millis>  → AnalysisResult
//! chat:<sessionId>                   → ChatSession
//! ```
//!
//! URLs contain colons, so the URL part of an analysis key is recovered by
//! splitting on the *last* colon.

use crate::errors::CoreError;

pub const ANALYSIS_PREFIX: &str = "analysis";
pub const CHAT_PREFIX: &str = "chat";

/// Format an analysis log key.
#[must_use]
pub fn analysis_key(url: &str, timestamp_millis: i64) -> String {
    format!("{ANALYSIS_PREFIX}:{url}:{timestamp_millis}")
}

/// Format a chat session key.
#[must_use]
pub fn chat_key(session_id: &str) -> String {
    format!("{CHAT_PREFIX}:{session_id}")
}

/// Split an analysis key back into `(url, timestamp_millis)`.
///
/// # Errors
///
/// Returns `CoreError::MalformedKey` if the prefix or timestamp is missing.
pub fn parse_analysis_key(key: &str) -> Result<(&str, i64), CoreError> {
    let rest = key
        .strip_prefix(ANALYSIS_PREFIX)
        .and_then(|r| r.strip_prefix(':'))
        .ok_or_else(|| CoreError::MalformedKey(key.to_string()))?;
    let (url, ts) = rest
        .rsplit_once(':')
        .ok_or_else(|| CoreError::MalformedKey(key.to_string()))?;
    let ts = ts
        .parse::<i64>()
        .map_err(|_| CoreError::MalformedKey(key.to_string()))?;
    if url.is_empty() {
        return Err(CoreError::MalformedKey(key.to_string()));
    }
    Ok((url, ts))
}
