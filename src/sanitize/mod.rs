//! Input Sanitization
//!
//! Recursively cleans untrusted JSON before it is persisted: strips script
//! blocks and inline event-handler attributes from strings, and reduces
//! object keys to `[A-Za-z0-9_]`.
//!
//! This is a heuristic filter, not an HTML sanitizer. Anything rendered into
//! a page still needs proper output encoding.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Longest key kept after cleaning, in characters.
pub const MAX_KEY_LENGTH: usize = 100;

/// Deepest nesting accepted before giving up.
pub const MAX_DEPTH: usize = 128;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());

static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)on\w+\s*=").unwrap());

// == Sanitize Error ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    /// Input nested deeper than [`MAX_DEPTH`]
    #[error("Input nested deeper than {0} levels")]
    DepthExceeded(usize),
}

// == Sanitize ==
/// Returns a cleaned copy of `value` with the same shape.
///
/// Scalars other than strings pass through, arrays keep their order and
/// length, and objects get their keys rewritten by [`sanitize_key`]. When two
/// keys clean to the same string the later one wins.
pub fn sanitize(value: &Value) -> Result<Value, SanitizeError> {
    sanitize_at(value, 0)
}

fn sanitize_at(value: &Value, depth: usize) -> Result<Value, SanitizeError> {
    if depth > MAX_DEPTH {
        return Err(SanitizeError::DepthExceeded(MAX_DEPTH));
    }

    let cleaned = match value {
        Value::String(s) => Value::String(sanitize_str(s)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| sanitize_at(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (key, field) in fields {
                out.insert(sanitize_key(key), sanitize_at(field, depth + 1)?);
            }
            Value::Object(out)
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    };
    Ok(cleaned)
}

// == Sanitize String ==
/// Removes `<script>` blocks and `on<word>=` fragments, then trims.
pub fn sanitize_str(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    let without_handlers = EVENT_HANDLER.replace_all(&without_scripts, "");
    without_handlers.trim().to_string()
}

// == Sanitize Key ==
/// Keeps ASCII letters, digits and `_`, truncated to [`MAX_KEY_LENGTH`].
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(MAX_KEY_LENGTH)
        .collect()
}
