//! Human-readable summaries for tool results.

use serde_json::Value;

pub mod board;
pub mod connections;
pub mod trains;

/// At most the first `len` characters of `s`.
pub(crate) fn prefix(s: &str, len: usize) -> &str {
    match s.char_indices().nth(len) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Characters `start..end` of `s`, empty when `s` is shorter.
pub(crate) fn slice(s: &str, start: usize, end: usize) -> &str {
    let rest = match s.char_indices().nth(start) {
        Some((begin, _)) => &s[begin..],
        None => return "",
    };
    prefix(rest, end.saturating_sub(start))
}

/// Scalar JSON values as plain text, strings without quotes.
pub(crate) fn plain(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
