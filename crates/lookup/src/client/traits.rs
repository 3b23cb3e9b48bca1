use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::RepositoryResponse;

/// A single GET against the Event Repository.
///
/// Implementations perform exactly one attempt and report any HTTP status
/// as a [`RepositoryResponse`]; only faults that produced no response at
/// all are errors. Retrying is the job of
/// [`RepositoryClient`](super::RepositoryClient).
#[async_trait]
pub trait RepositoryTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RepositoryResponse, TransportError>;
}
