//! Shared HTTP response helpers for the oracle client.

use crate::error::OracleError;

/// Check an oracle HTTP response for common error conditions.
///
/// Returns the response unchanged on success. A 429 becomes
/// [`OracleError::RateLimited`] (with `Retry-After` parsed, 60 s if absent);
/// any other non-success status becomes [`OracleError::Api`] carrying the body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, OracleError> {
    if resp.status() == 429 {
        return Err(OracleError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(OracleError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}
