/// Raw answer of one repository attempt.
///
/// Returned by value from each call; nothing keeps a reference to it once
/// the lookup that issued the call is done.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepositoryResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RepositoryResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decoded outcome of one lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LookupResult {
    /// Status the repository answered with
    pub status: u16,
    /// Matched event identifiers, in repository order
    pub identifiers: Vec<String>,
}
