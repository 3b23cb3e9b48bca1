//! Registry of message services keyed by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::MessageService;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum RegistryError {
    #[error("A message service named '{0}' is already registered")]
    DuplicateService(String),
}

/// Message services available to the gateway.
///
/// Built once at startup and only read afterwards.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: BTreeMap<String, Arc<dyn MessageService>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service. Names are unique.
    pub fn register(&mut self, service: Arc<dyn MessageService>) -> Result<(), RegistryError> {
        let name = service.name().to_string();
        if self.services.contains_key(&name) {
            return Err(RegistryError::DuplicateService(name));
        }
        info!("Registered message service '{}' ({})", name, service.version());
        self.services.insert(name, service);
        Ok(())
    }

    /// Service registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn MessageService>> {
        self.services.get(name)
    }

    /// Registered service names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Name and version of every registered service.
    pub fn versions(&self) -> BTreeMap<String, String> {
        self.services
            .iter()
            .map(|(name, service)| (name.clone(), service.version().to_string()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
