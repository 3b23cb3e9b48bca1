//! Fail-fast rules over decoded lookup results.

use crate::errors::PolicyViolation;
use crate::models::LookupPolicyConfig;

/// Check `identifiers` against the caller's policy.
///
/// On success the list is cut to the first `limit` identifiers. The
/// repository is asked for `pageSize = limit`, but its answer is not trusted
/// to honor that.
pub fn evaluate(
    mut identifiers: Vec<String>,
    config: &LookupPolicyConfig,
) -> Result<Vec<String>, PolicyViolation> {
    if config.fail_if_multiple_found && identifiers.len() > 1 {
        return Err(PolicyViolation::FailMultiple {
            found: identifiers.len(),
        });
    }
    if config.fail_if_none_found && identifiers.is_empty() {
        return Err(PolicyViolation::FailNone);
    }

    identifiers.truncate(config.limit as usize);
    Ok(identifiers)
}
