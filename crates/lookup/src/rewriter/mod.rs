//! Expansion of resolved lookups into concrete links.

use serde_json::Value;

use crate::models::LookupLink;

/// One concrete link per identifier, in identifier order.
///
/// Every produced link keeps the lookup's relation type and extra fields;
/// the criteria are dropped. An empty identifier list yields no links.
pub fn expand(link: &LookupLink, identifiers: &[String]) -> Vec<Value> {
    identifiers.iter().map(|id| link.resolved_to(id)).collect()
}
