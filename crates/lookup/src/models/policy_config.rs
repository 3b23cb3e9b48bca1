use crate::errors::LookupError;

/// Per-request lookup parameters.
///
/// Defaults match a request that passes none of them: lenient on both
/// counts, federated search on, one identifier per lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LookupPolicyConfig {
    /// Abort the request when a lookup matches more than one event.
    pub fail_if_multiple_found: bool,
    /// Abort the request when a lookup matches no event.
    pub fail_if_none_found: bool,
    /// Also search repositories federated with the configured one.
    /// Sent to the repository as `shallow`.
    pub connect_to_external_ers: bool,
    /// Maximum identifiers used per lookup. Sent as `pageSize`.
    pub limit: u32,
}

impl Default for LookupPolicyConfig {
    fn default() -> Self {
        Self {
            fail_if_multiple_found: false,
            fail_if_none_found: false,
            connect_to_external_ers: true,
            limit: 1,
        }
    }
}

impl LookupPolicyConfig {
    pub fn validate(&self) -> Result<(), LookupError> {
        if self.limit == 0 {
            return Err(LookupError::InvalidInput(
                "limit must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}
