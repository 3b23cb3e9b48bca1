//! Error types and failure classification for the lookup crate.
//!
//! This module provides:
//! - [`LookupError`]: The main error enum for all lookup operations
//! - [`PolicyViolation`]: Which caller-stated lookup policy was violated
//! - [`TransportError`]: A single failed attempt to reach the repository
//! - [`LookupErrorKind`]: Classification used by the caller-facing boundary

mod kind;

pub use kind::LookupErrorKind;

use thiserror::Error;

/// A lookup result that contradicts the policy the caller asked for.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum PolicyViolation {
    /// More than one event matched while `failIfMultipleFound` was set.
    #[error("Multiple event ids found with lookup criteria ({found} matches, failIfMultipleFound is set)")]
    FailMultiple {
        /// Number of identifiers the repository returned
        found: usize,
    },

    /// No event matched while `failIfNoneFound` was set.
    #[error("No event id found with lookup criteria (failIfNoneFound is set)")]
    FailNone,
}

/// A transport-level fault on a single repository attempt.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    timeout: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: true,
        }
    }

    /// Whether the attempt was cut off by the request timeout.
    pub fn is_timeout(&self) -> bool {
        self.timeout
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("Request timed out: {}", err))
        } else {
            Self::new(format!("Request failed: {}", err))
        }
    }
}

/// Errors that can occur while resolving lookup links.
///
/// Any of these aborts the whole resolution: no partially rewritten body is
/// ever returned alongside an error.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Every attempt reached the repository but none answered with a
    /// success status.
    #[error("Event repository unavailable: no success status after {attempts} attempt(s), last status {last_status}")]
    RepositoryUnavailable {
        /// Attempts made for the failing lookup
        attempts: u32,
        /// Status of the final attempt
        last_status: u16,
    },

    /// The final attempt failed at the transport level.
    #[error("Unable to connect to event repository after {attempts} attempt(s): {source}")]
    Transport {
        /// Attempts made for the failing lookup
        attempts: u32,
        /// Fault of the final attempt
        #[source]
        source: TransportError,
    },

    /// The decoded identifiers violate the caller's lookup policy.
    #[error("{0}")]
    PolicyViolation(#[from] PolicyViolation),

    /// A repository body, or a lookup link, is not in the expected shape.
    #[error("Unexpected lookup data: {0}")]
    Decode(String),

    /// The request cannot be processed at all.
    #[error("Invalid lookup request: {0}")]
    InvalidInput(String),
}

impl LookupError {
    /// Returns the caller-facing classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use eventgen_lookup::errors::{LookupError, LookupErrorKind, PolicyViolation};
    ///
    /// let error = LookupError::from(PolicyViolation::FailNone);
    /// assert_eq!(error.kind(), LookupErrorKind::FailNone);
    ///
    /// let error = LookupError::Decode("not an array".to_string());
    /// assert_eq!(error.kind(), LookupErrorKind::RepositoryUnavailable);
    /// ```
    pub fn kind(&self) -> LookupErrorKind {
        match self {
            Self::RepositoryUnavailable { .. } | Self::Transport { .. } | Self::Decode(_) => {
                LookupErrorKind::RepositoryUnavailable
            }
            Self::PolicyViolation(PolicyViolation::FailNone) => LookupErrorKind::FailNone,
            Self::PolicyViolation(PolicyViolation::FailMultiple { .. }) => {
                LookupErrorKind::FailMultiple
            }
            Self::InvalidInput(_) => LookupErrorKind::Internal,
        }
    }
}
