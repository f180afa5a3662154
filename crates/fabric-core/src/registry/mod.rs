//! Plugin-based transport registry
//!
//! The registry allows transports to be registered dynamically at runtime,
//! avoiding hardcoded if-else chains in the binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fabric_core::registry::TransportRegistry;
//! use fabric_core::config::TransportConfig;
//!
//! let registry = TransportRegistry::new();
//! fabric_transport_http::register(&registry);
//!
//! let config = TransportConfig::http("apstra.example.net", token);
//! let transport = registry.create_transport(&config)?;
//! ```

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::traits::{Transport, TransportFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Transport registry for plugin-based transport creation
///
/// The registry maintains a map of transport type names to factory objects.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct TransportRegistry {
    /// Registered transport factories
    transports: RwLock<HashMap<String, Box<dyn TransportFactory>>>,
}

impl TransportRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport factory
    ///
    /// Registering a name twice replaces the earlier factory.
    ///
    /// # Parameters
    ///
    /// - `name`: Transport type name (e.g., "http")
    /// - `factory`: Factory object for creating transport instances
    pub fn register_transport(&self, name: impl Into<String>, factory: Box<dyn TransportFactory>) {
        let name = name.into();
        let mut transports = self
            .transports
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        transports.insert(name, factory);
    }

    /// Create a transport from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Transport>)`: Created transport instance
    /// - `Err(Error)`: If the transport type is not registered, the
    ///   configuration is invalid, or creation fails
    pub fn create_transport(&self, config: &TransportConfig) -> Result<Box<dyn Transport>> {
        config.validate()?;

        let transport_type = config.type_name();
        let transports = self
            .transports
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = transports
            .get(transport_type)
            .ok_or_else(|| Error::config(format!("Unknown transport type: {}", transport_type)))?;

        factory.create(config)
    }

    /// List all registered transport types
    pub fn list_transports(&self) -> Vec<String> {
        let transports = self
            .transports
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = transports.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a transport type is registered
    pub fn has_transport(&self, name: &str) -> bool {
        let transports = self
            .transports
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        transports.contains_key(name)
    }
}
