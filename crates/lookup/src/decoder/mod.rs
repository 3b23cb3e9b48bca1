//! Extraction of event identifiers from repository answers.
//!
//! Accepted bodies:
//!
//! ```text
//! ["id-1", "id-2"]                                  plain identifier list
//! [{"meta": {"id": "id-1"}, ...}, ...]              list of events
//! {"items": [ ...either of the above... ], ...}     paged search result
//! ```
//!
//! Events without `meta.id` fall back to a top-level `id`.

use serde_json::Value;

use crate::errors::LookupError;

/// Decode the matched identifiers, in repository order.
pub fn decode_identifiers(body: &str) -> Result<Vec<String>, LookupError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| LookupError::Decode(format!("repository body is not JSON: {}", e)))?;

    let items = match &parsed {
        Value::Array(items) => items,
        Value::Object(page) => match page.get("items") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(LookupError::Decode(
                    "repository object carries no 'items' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(LookupError::Decode(
                "repository body is neither a list nor a paged result".to_string(),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| identifier_of(item).ok_or_else(|| {
            LookupError::Decode(format!("repository item {} carries no event id", index))
        }))
        .collect()
}

fn identifier_of(item: &Value) -> Option<String> {
    match item {
        Value::String(id) => Some(id.clone()),
        Value::Object(_) => item
            .pointer("/meta/id")
            .and_then(Value::as_str)
            .or_else(|| item.get("id").and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}
