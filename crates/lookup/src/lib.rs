//! Event Repository lookup resolution.
//!
//! Event bodies may carry link entries whose `target` is the `%lookup%`
//! placeholder together with a set of search criteria. Before such a body can
//! be handed to a message service, every placeholder has to be replaced by
//! the identifiers of the matching events stored in the Event Repository (ER).
//!
//! # Architecture
//!
//! ```text
//!  +--------------------+
//!  | LookupOrchestrator |  scans eventParams.links, all-or-nothing
//!  +--------------------+
//!     |  per unresolved link, in link order
//!     v
//!  +--------------+   +------------------+   +---------+   +--------+   +----------+
//!  | LookupQuery  |-->| RepositoryClient |-->| decoder |-->| policy |-->| rewriter |
//!  +--------------+   +------------------+   +---------+   +--------+   +----------+
//!                         |  bounded retry
//!                         v
//!                  +---------------------+
//!                  | RepositoryTransport |  (reqwest by default)
//!                  +---------------------+
//! ```
//!
//! # Core Types
//!
//! - [`LookupOrchestrator`] - Entry point resolving a whole event body
//! - [`LookupPolicyConfig`] - Per-request lookup parameters
//! - [`LinkEntry`] - Classification of one element of the link collection
//! - [`RepositoryClient`] - Retrying repository client
//! - [`LookupError`] - Typed failures, classified by [`LookupErrorKind`]

pub mod client;
pub mod decoder;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod query;
pub mod rewriter;

pub use client::{HttpTransport, RepositoryClient, RepositoryTransport, RetryPolicy};
pub use errors::{LookupError, LookupErrorKind, PolicyViolation, TransportError};
pub use models::{
    LinkEntry, LookupLink, LookupPolicyConfig, LookupResult, RepositoryResponse, LINKS_POINTER,
    LOOKUP_SENTINEL,
};
pub use orchestrator::{LookupOrchestrator, LookupSettings};
pub use query::LookupQuery;
