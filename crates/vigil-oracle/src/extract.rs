//! Strict extraction of the classification payload from free text.
//!
//! The oracle is asked for a bare JSON object but may wrap it in prose or a
//! code fence. The first balanced `{...}` span is located with a scanner that
//! ignores braces inside JSON strings, then the span is validated against the
//! `classification_payload` schema before it is decoded.

use vigil_core::entities::ClassificationPayload;
use vigil_schema::{CLASSIFICATION_PAYLOAD, SchemaRegistry};

use crate::OracleError;

/// Return the first balanced `{...}` span in `text`, if any.
///
/// Candidates are tried left to right; a `{` that never closes is skipped
/// in favor of the next one.
#[must_use]
pub fn first_json_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .find_map(|(start, _)| balanced_end(&text[start..]).map(|len| &text[start..start + len]))
}

/// Byte length of the balanced object at the start of `s`.
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract, validate, and decode a classification payload.
///
/// # Errors
///
/// - [`OracleError::NoJson`] when no balanced object is present.
/// - [`OracleError::Decode`] when the span is not JSON.
/// - [`OracleError::Schema`] when the object violates the schema (missing or
///   extra fields, unknown enum values, empty name).
pub fn parse_classification(
    text: &str,
    schemas: &SchemaRegistry,
) -> Result<ClassificationPayload, OracleError> {
    let span = first_json_object(text).ok_or(OracleError::NoJson)?;
    let value: serde_json::Value = serde_json::from_str(span)?;
    schemas.validate(CLASSIFICATION_PAYLOAD, &value)?;
    Ok(serde_json::from_value(value)?)
}
