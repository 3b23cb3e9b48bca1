use serde_json::{Map, Value};

use crate::errors::LookupError;

/// Placeholder a link `target` carries until it is resolved.
pub const LOOKUP_SENTINEL: &str = "%lookup%";

/// JSON pointer of the link collection inside an event body.
pub const LINKS_POINTER: &str = "/eventParams/links";

const TYPE_FIELD: &str = "type";
const TARGET_FIELD: &str = "target";
const CRITERIA_FIELD: &str = "criteria";

/// One element of an event's link collection.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkEntry {
    /// Anything that is not a lookup. Copied to the output untouched.
    Passthrough(Value),
    /// A link whose target still has to be looked up.
    Unresolved(LookupLink),
}

/// A link entry whose `target` is the lookup placeholder.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupLink {
    /// Relation type, e.g. `CAUSE` or `CONTEXT`.
    pub link_type: String,
    /// Search criteria sent to the repository, in document order.
    pub criteria: Map<String, Value>,
    /// Any other fields of the entry, carried over to every resolved link.
    pub extra: Map<String, Value>,
}

/// Whether a single raw link carries the placeholder as its target.
///
/// Only the `target` field is inspected; the placeholder text appearing in
/// other fields does not make a link unresolved.
pub fn is_unresolved(link: &Value) -> bool {
    link.get(TARGET_FIELD).and_then(Value::as_str) == Some(LOOKUP_SENTINEL)
}

/// Whether the body holds at least one unresolved link.
pub fn has_unresolved_links(body: &Value) -> bool {
    body.pointer(LINKS_POINTER)
        .and_then(Value::as_array)
        .is_some_and(|links| links.iter().any(is_unresolved))
}

impl LinkEntry {
    /// Classify a raw link entry.
    ///
    /// Fails with [`LookupError::Decode`] when a link carries the placeholder
    /// but lacks a string `type` or a non-empty `criteria` object.
    pub fn classify(link: Value) -> Result<Self, LookupError> {
        if !is_unresolved(&link) {
            return Ok(Self::Passthrough(link));
        }

        let Value::Object(mut fields) = link else {
            // is_unresolved only holds for objects
            return Err(LookupError::Decode("lookup link is not an object".to_string()));
        };

        let link_type = match fields.shift_remove(TYPE_FIELD) {
            Some(Value::String(link_type)) => link_type,
            _ => {
                return Err(LookupError::Decode(
                    "lookup link is missing a string 'type'".to_string(),
                ))
            }
        };

        let criteria = match fields.shift_remove(CRITERIA_FIELD) {
            Some(Value::Object(criteria)) if !criteria.is_empty() => criteria,
            _ => {
                return Err(LookupError::Decode(format!(
                    "lookup link of type '{}' has no lookup criteria",
                    link_type
                )))
            }
        };

        fields.shift_remove(TARGET_FIELD);

        Ok(Self::Unresolved(LookupLink {
            link_type,
            criteria,
            extra: fields,
        }))
    }
}

impl LookupLink {
    /// Build the concrete link pointing at `target`.
    pub fn resolved_to(&self, target: &str) -> Value {
        let mut fields = Map::with_capacity(self.extra.len() + 2);
        fields.insert(TYPE_FIELD.to_string(), Value::String(self.link_type.clone()));
        fields.insert(TARGET_FIELD.to_string(), Value::String(target.to_string()));
        for (key, value) in &self.extra {
            fields.insert(key.clone(), value.clone());
        }
        Value::Object(fields)
    }
}
