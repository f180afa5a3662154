// # Transport Trait
//
// Defines the interface the engine needs from the remote management service.
//
// ## Implementations
//
// - HTTP/REST: `fabric-transport-http` crate
// - Tests: in-memory recording doubles
//
// ## Usage
//
// ```rust,ignore
// use fabric_core::Transport;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let transport = /* Transport implementation */;
//
//     let response = transport.fetch_collection("resources/ip-pools").await?;
//     println!("{} -> {}", response.status, response.body);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde_json::Value;

/// Raw response of one remote call
///
/// The body is already deserialized. Empty bodies are `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    /// Numeric status returned by the remote service
    pub status: u16,
    /// Deserialized response body
    pub body: Value,
}

impl RemoteResponse {
    /// Create a response
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx class
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for transport implementations
///
/// A transport moves requests to the remote service and hands back whatever
/// came back. It makes no decisions.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS calls to the configured service only
/// - ✅ Handle authentication, TLS and timeouts
/// - ✅ Deserialize response bodies
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (a failed call is surfaced to the caller)
/// - ❌ Interpret status codes (owned by `ReconcileEngine`)
/// - ❌ Cache responses between calls (every snapshot is fetched fresh)
/// - ❌ Spawn tasks or threads
///
/// ## Errors
///
/// `Err` means no response was obtained at all (connection refused, TLS
/// failure, timeout). A response with a non-success status is still
/// `Ok(RemoteResponse)`; the engine turns it into a transport error.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read a full collection
    ///
    /// # Parameters
    ///
    /// - `path`: Collection path relative to the API root (e.g. `resources/ip-pools`)
    async fn fetch_collection(&self, path: &str) -> Result<RemoteResponse, crate::Error>;

    /// Create a record in a collection
    ///
    /// # Parameters
    ///
    /// - `path`: Collection path relative to the API root
    /// - `payload`: Wire-shape create payload
    async fn create(&self, path: &str, payload: &Value) -> Result<RemoteResponse, crate::Error>;

    /// Delete a single record
    ///
    /// # Parameters
    ///
    /// - `path`: Record path relative to the API root (`{collection}/{id}`)
    async fn delete(&self, path: &str) -> Result<RemoteResponse, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}

/// Helper trait for constructing transports from configuration
pub trait TransportFactory: Send + Sync {
    /// Create a Transport instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this transport
    ///
    /// # Returns
    ///
    /// A boxed Transport trait object
    fn create(
        &self,
        config: &crate::config::TransportConfig,
    ) -> Result<Box<dyn Transport>, crate::Error>;
}
