use ammonia::Builder;
use serde_json::Value;
use std::collections::HashSet;

use crate::config::API_PREFIX;

/// Join the configured origin, the `/api` prefix and an endpoint path.
pub fn api_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let base = base.strip_suffix(API_PREFIX).unwrap_or(base);
    format!("{}{}/{}", base, API_PREFIX, path.trim_start_matches('/'))
}

/// Percent-encode an id for use as a single path segment.
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Pull the human-readable message out of an error body (`{"msg": ...}`,
/// `{"error": ...}`, `{"message": ...}` or a bare string).
pub fn server_message(body: &Value) -> Option<String> {
    let msg = match body {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => ["msg", "error", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    }?;
    let msg = msg.trim();
    (!msg.is_empty()).then(|| msg.to_string())
}

/// Strip all markup, leaving plain text for terminal output.
pub fn plain_text(text: &str) -> String {
    Builder::default()
        .tags(HashSet::new())
        .clean(text)
        .to_string()
}
