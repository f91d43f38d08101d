//! Tolerant unwrapping of the Item Search response envelope.
//!
//! The API has been observed to answer in several shapes depending on
//! `formatVersion` and gateway quirks:
//!
//! ```text
//! { "items": [ {...}, ... ] }                 // formatVersion 2, flat
//! { "Items": [ { "Item": {...} }, ... ] }     // legacy, wrapped entries
//! { "Items": [ {...}, ... ] }                 // legacy, unwrapped entries
//! { "item": {...} } / { "Item": {...} }       // single-object forms
//! ```
//!
//! Totals arrive under `count`/`Count` and the page size under
//! `hits`/`Hits`, as numbers or numeric strings. None of this is worth a
//! typed envelope; everything here inspects `serde_json::Value` and the
//! item payloads are decoded individually afterwards.

use serde_json::Value;

/// Keys that carry an API-level error message in an otherwise 2xx response.
const ERROR_KEYS: [&str; 4] = ["error", "error_description", "errorMessage", "message"];

/// Extracts the item objects from any of the supported envelope shapes.
/// Non-object entries are skipped. Unknown shapes yield an empty list.
pub(crate) fn extract_items(body: &Value) -> Vec<Value> {
    let Value::Object(map) = body else {
        return Vec::new();
    };

    if let Some(Value::Array(items)) = map.get("items") {
        return items.iter().filter(|v| v.is_object()).cloned().collect();
    }

    if let Some(Value::Array(entries)) = map.get("Items") {
        return entries
            .iter()
            .filter_map(|entry| {
                let obj = entry.as_object()?;
                match obj.get("Item") {
                    Some(inner @ Value::Object(_)) => Some(inner.clone()),
                    _ => Some(entry.clone()),
                }
            })
            .collect();
    }

    for key in ["item", "Item"] {
        if let Some(single @ Value::Object(_)) = map.get(key) {
            return vec![single.clone()];
        }
    }

    Vec::new()
}

/// Returns the embedded API-level error message, if the payload carries one.
///
/// A non-blank string under any of [`ERROR_KEYS`], or a non-empty `errors`
/// array, counts as an error regardless of the HTTP status.
pub(crate) fn extract_error_message(body: &Value) -> Option<String> {
    let map = body.as_object()?;

    for key in ERROR_KEYS {
        if let Some(Value::String(msg)) = map.get(key) {
            if !msg.trim().is_empty() {
                return Some(format!("{key}: {msg}"));
            }
        }
    }

    if let Some(Value::Array(errors)) = map.get("errors") {
        if let Some(first) = errors.first() {
            return Some(format!("errors: {first}"));
        }
    }

    None
}

/// Reads the first of `keys` as a non-negative integer, accepting either a
/// JSON number or a numeric string.
pub(crate) fn extract_u64(body: &Value, keys: &[&str]) -> Option<u64> {
    let map = body.as_object()?;
    for key in keys {
        match map.get(*key) {
            Some(Value::Number(n)) => return n.as_u64(),
            Some(Value::String(s)) => return s.trim().parse::<u64>().ok(),
            _ => {}
        }
    }
    None
}
