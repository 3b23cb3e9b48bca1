//! Event Repository client.
//!
//! - [`RepositoryTransport`] performs one attempt
//! - [`HttpTransport`] is the reqwest implementation used in production
//! - [`RepositoryClient`] wraps a transport with a bounded [`RetryPolicy`]

mod http;
mod retry;
mod traits;

pub use http::{HttpTransport, DEFAULT_REQUEST_TIMEOUT};
pub use retry::{RepositoryClient, RetryPolicy};
pub use traits::RepositoryTransport;
