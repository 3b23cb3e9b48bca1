//! Message service abstraction.
//!
//! A message service turns a resolved event body into a serialized message
//! of one protocol. The gateway knows nothing about any protocol; services
//! are registered by name in a [`ServiceRegistry`] and selected per request.

mod registry;
mod traits;

pub use registry::{RegistryError, ServiceRegistry};
pub use traits::{GenerateError, MessageService};
