//! Data types shared by the lookup components.
//!
//! - `link` - Link entries and the lookup placeholder
//! - `policy_config` - Per-request lookup parameters
//! - `response` - Repository answers and decoded lookup results

mod link;
mod policy_config;
mod response;

pub use link::{
    has_unresolved_links, is_unresolved, LinkEntry, LookupLink, LINKS_POINTER, LOOKUP_SENTINEL,
};
pub use policy_config::LookupPolicyConfig;
pub use response::{LookupResult, RepositoryResponse};
