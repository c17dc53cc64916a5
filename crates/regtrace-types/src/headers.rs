use serde_json::Value;
use std::collections::HashMap;

/// Placeholder stored in place of credential header values
pub const REDACTED: &str = "[REDACTED]";

/// Header names whose values must never reach a persisted trace
const SENSITIVE_HEADERS: &[&str] = &["authorization", "x-api-key", "api-key"];

/// Check whether a header carries credentials (case-insensitive)
pub fn is_sensitive_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SENSITIVE_HEADERS.contains(&lower.as_str())
}

/// Collapse a multi-value header map into one string per key, redacting
/// credential headers.
///
/// Multiple values for the same key are joined with ", " per RFC 9110
/// list-field semantics.
pub fn flatten_headers<'a, I>(headers: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (&'a str, Vec<&'a str>)>,
{
    let mut result = HashMap::new();
    for (name, values) in headers {
        if is_sensitive_header(name) {
            result.insert(name.to_string(), REDACTED.to_string());
        } else {
            result.insert(name.to_string(), values.join(", "));
        }
    }
    result
}

/// Validate a body as JSON, or wrap it as a JSON string.
///
/// Empty bodies become `Value::Null`. Non-JSON payloads are stored as a
/// quoted string (lossy only for invalid UTF-8) so the trace keeps the
/// full content either way.
pub fn sanitize_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }

    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(body).into_owned()),
    }
}
