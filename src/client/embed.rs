//! Embed-code response parsing
//!
//! Depending on API version, `GET /charts/{id}/embed-codes` returns either a
//! list of `{"id": "responsive", "code": "..."}` variants, or a mapping keyed
//! by variant name (possibly wrapped in a one-element list). The parser probes
//! for each shape instead of committing to one.

use serde_json::Value;

const RESPONSIVE_KEYS: &[&str] = &["responsive"];
const STATIC_KEYS: &[&str] = &["iframe", "static"];

/// Extract the requested embed code, or an empty string when none matches
pub fn parse_embed_code(value: &Value, responsive: bool) -> String {
    let keys = if responsive { RESPONSIVE_KEYS } else { STATIC_KEYS };

    match value {
        Value::Array(items) => {
            find_variant(items, keys)
                .or_else(|| items.first().and_then(|first| find_keyed(first, keys)))
                .unwrap_or_default()
        }
        Value::Object(_) => find_keyed(value, keys).unwrap_or_default(),
        _ => String::new(),
    }
}

fn find_variant(items: &[Value], keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        items
            .iter()
            .find(|item| item.get("id").and_then(Value::as_str) == Some(*key))
            .and_then(|item| item.get("code"))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

fn find_keyed(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
