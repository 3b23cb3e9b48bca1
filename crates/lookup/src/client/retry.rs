//! Bounded-retry repository client.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use super::RepositoryTransport;
use crate::errors::{LookupError, TransportError};
use crate::models::RepositoryResponse;

/// Default number of attempts per lookup.
const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// How often, and how patiently, a lookup is retried.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Pause before each retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Repository client retrying failed attempts under a [`RetryPolicy`].
///
/// Holds no per-call state, so a single instance is shared by all
/// concurrent requests.
#[derive(Clone)]
pub struct RepositoryClient {
    transport: Arc<dyn RepositoryTransport>,
    policy: RetryPolicy,
}

impl RepositoryClient {
    pub fn new(transport: Arc<dyn RepositoryTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `url`, retrying on transport faults and non-success statuses.
    ///
    /// Returns as soon as an attempt succeeds. Once attempts are exhausted,
    /// the last response is returned even if its status is not a success;
    /// only a transport fault on the final attempt is an error.
    pub async fn fetch(&self, url: &str) -> Result<RepositoryResponse, LookupError> {
        let attempts = self.policy.attempts();
        let mut last: Result<RepositoryResponse, TransportError> =
            Err(TransportError::new("no attempt made"));

        for attempt in 1..=attempts {
            if attempt > 1 && !self.policy.backoff.is_zero() {
                tokio::time::sleep(self.policy.backoff).await;
            }

            match self.transport.get(url).await {
                Ok(response) if response.is_success() => {
                    info!(
                        "Event repository answered with status {} (attempt {}/{})",
                        response.status, attempt, attempts
                    );
                    return Ok(response);
                }
                Ok(response) => {
                    warn!(
                        "Event repository answered with status {} (attempt {}/{})",
                        response.status, attempt, attempts
                    );
                    last = Ok(response);
                }
                Err(e) => {
                    warn!(
                        "Event repository request failed (attempt {}/{}): {}",
                        attempt, attempts, e
                    );
                    last = Err(e);
                }
            }
        }

        last.map_err(|source| {
            error!(
                "Unable to connect to configured event repository: {}",
                source
            );
            LookupError::Transport { attempts, source }
        })
    }
}
