/// Classification of lookup failures for the caller-facing boundary.
///
/// Used to decide how a failed resolution is reported. The lookup crate
/// itself never maps errors to transport codes.
///
/// # Behavior Summary
///
/// | Kind | Caller actionable? | Detail exposed? |
/// |------|-------------------|-----------------|
/// | `RepositoryUnavailable` | No (retry later) | Yes |
/// | `FailNone` | Yes | Yes |
/// | `FailMultiple` | Yes | Yes |
/// | `Internal` | No | No, logged only |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LookupErrorKind {
    /// The repository could not be reached, kept answering with a non-success
    /// status, or answered with a body that is not an identifier list.
    RepositoryUnavailable,

    /// `failIfNoneFound` was requested and a lookup matched no event.
    FailNone,

    /// `failIfMultipleFound` was requested and a lookup matched several events.
    FailMultiple,

    /// Anything else. The request itself was not usable.
    Internal,
}
