//! Row-to-entity parsing helpers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DatabaseError;

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// Accepts RFC 3339 as written by this crate and `SQLite`'s
/// `datetime('now')` format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if neither format matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Decode a JSON payload column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` naming the row key if the payload does not
/// decode into `T`.
pub fn decode_payload<T: DeserializeOwned>(key: &str, payload: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(payload)
        .map_err(|e| DatabaseError::Query(format!("Corrupt payload for '{key}': {e}")))
}

/// Encode a value for a JSON payload column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn encode_payload<T: Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_both_datetime_formats() {
        let rfc = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let sqlite = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(rfc, sqlite);
        assert_eq!(rfc.year(), 2026);
        assert_eq!(rfc.hour(), 14);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn corrupt_payload_names_key() {
        let err = decode_payload::<serde_json::Value>("chat:s-1", "{not json").unwrap_err();
        assert!(err.to_string().contains("chat:s-1"));
    }
}
