//! Repository query construction.
//!
//! A lookup link's criteria become the query string of a repository search:
//!
//! ```text
//! criteria: {"meta.type": "ArtifactCreated", "data.identity": ["pkg:a", "pkg:b"]}
//!   -> <base>?meta.type=ArtifactCreated&data.identity=pkg%3Aa&data.identity=pkg%3Ab&shallow=true&pageSize=1
//! ```

use std::fmt::Write as _;

use serde_json::Value;

use crate::errors::LookupError;
use crate::models::{LookupLink, LookupPolicyConfig};

/// A repository search derived from one lookup link.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LookupQuery {
    /// Encoded `key=value` criteria pairs joined with `&`
    criteria: String,
    /// Whether federated repositories are searched too
    shallow: bool,
    /// Requested page size
    page_size: u32,
}

impl LookupQuery {
    /// Build the query for `link` under the request's policy.
    pub fn new(link: &LookupLink, config: &LookupPolicyConfig) -> Result<Self, LookupError> {
        if link.criteria.is_empty() {
            return Err(LookupError::Decode(format!(
                "lookup link of type '{}' has no lookup criteria",
                link.link_type
            )));
        }

        let mut criteria = String::new();
        for (key, value) in &link.criteria {
            match value {
                Value::Array(values) => {
                    for value in values {
                        push_pair(&mut criteria, key, value)?;
                    }
                }
                _ => push_pair(&mut criteria, key, value)?,
            }
        }

        Ok(Self {
            criteria,
            shallow: config.connect_to_external_ers,
            page_size: config.limit,
        })
    }

    pub fn criteria(&self) -> &str {
        &self.criteria
    }

    /// Full request URL against the repository at `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}&shallow={}&pageSize={}",
            base_url, separator, self.criteria, self.shallow, self.page_size
        )
    }
}

fn push_pair(out: &mut String, key: &str, value: &Value) -> Result<(), LookupError> {
    let value = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(LookupError::Decode(format!(
                "lookup criterion '{}' must be a string, number or boolean",
                key
            )))
        }
    };

    if !out.is_empty() {
        out.push('&');
    }
    // Writing into a String cannot fail
    let _ = write!(
        out,
        "{}={}",
        urlencoding::encode(key),
        urlencoding::encode(&value)
    );
    Ok(())
}
