//! Message service trait definitions.

use serde_json::Value;
use thiserror::Error;

/// Why a message service did not produce a message.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The service refused the input and explains why.
    ///
    /// The report is meant for the caller and is returned to it as is.
    #[error("message rejected by service")]
    Rejected(Value),

    /// The service failed for reasons the caller cannot act on.
    #[error("{0}")]
    Internal(String),
}

/// Trait for protocol message services.
///
/// Implement this trait to add support for a new message protocol.
///
/// # Example
///
/// ```ignore
/// use eventgen_protocol::{GenerateError, MessageService};
/// use serde_json::Value;
///
/// struct EchoService;
///
/// impl MessageService for EchoService {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn generate(&self, _msg_type: &str, body: &Value) -> Result<Value, GenerateError> {
///         Ok(body.clone())
///     }
///
///     fn supported_event_types(&self) -> Vec<String> {
///         Vec::new()
///     }
///
///     fn template(&self, _event_type: &str) -> Option<Value> {
///         None
///     }
/// }
/// ```
pub trait MessageService: Send + Sync {
    /// Name the service is selected by, e.g. `eiffelsemantics`.
    fn name(&self) -> &str;

    /// Version reported by the versions listing.
    fn version(&self) -> &str {
        "unknown"
    }

    /// Build a message of `msg_type` from a resolved event body.
    fn generate(&self, msg_type: &str, body: &Value) -> Result<Value, GenerateError>;

    /// Event types this service can generate.
    fn supported_event_types(&self) -> Vec<String>;

    /// Example input body for `event_type`, if the service has one.
    fn template(&self, event_type: &str) -> Option<Value>;
}
