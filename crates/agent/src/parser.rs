//! Response parsing — extract a JSON object from raw model output.
//!
//! Models wrap JSON in markdown code fences more often than not, so the
//! parser strips a leading fence line (with optional language tag) and a
//! trailing fence before attempting a strict parse. There is no partial
//! recovery: no bracket matching, no repair. A reply that does not parse as
//! a single JSON object is reported upward verbatim so the caller can react
//! to the model misbehaving instead of papering over it.

use gitteach_core::error::ParseError;

/// Parse one JSON object out of raw model output.
///
/// Returns `ParseError::Malformed` (carrying the raw text) if the remainder
/// after fence stripping is not exactly one JSON object.
pub fn parse_json_object(raw: &str) -> Result<serde_json::Value, ParseError> {
    let candidate = strip_code_fences(raw);

    let value: serde_json::Value =
        serde_json::from_str(candidate).map_err(|_| ParseError::Malformed {
            raw: raw.to_string(),
        })?;

    if !value.is_object() {
        return Err(ParseError::Malformed {
            raw: raw.to_string(),
        });
    }

    Ok(value)
}

/// Strip a leading and trailing triple-backtick fence, if present.
///
/// Only the start and end of the text are touched; interior fences are left
/// alone and will fail the strict parse, as they should.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the rest of the fence line (e.g. a "json" language tag).
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }

    text = text.trim_end();
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}
