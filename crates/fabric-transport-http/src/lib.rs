// # HTTP Transport
//
// This crate provides the HTTPS REST transport for the fabric reconciliation
// engine. It speaks to the management service's collection API:
//
// - List a collection: GET `/api/{collection}` → `{"items": [...]}`
// - Create an entry: POST `/api/{collection}` with the JSON payload → `201`
// - Delete an entry: DELETE `/api/{collection}/{id}` → `2xx`
//
// ## Constraints
//
// - Exactly one HTTP request per call, never retried
// - No state kept between calls
// - Status codes are returned to the engine as-is; the engine decides what
//   counts as success
// - `Err` only when no HTTP response was obtained (connection, TLS, timeout)
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - An empty API token is rejected at construction

use async_trait::async_trait;
use fabric_core::config::TransportConfig;
use fabric_core::traits::{RemoteResponse, Transport, TransportFactory};
use fabric_core::{Error, Result, TransportRegistry};
use serde_json::Value;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTPS transport to the management service
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct HttpTransport {
    /// Session token sent as a bearer credential
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Base URL, e.g. `https://fabric.example.net:443/api`
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport for `https://{host}:{port}/api`
    ///
    /// # Parameters
    ///
    /// - `host`: Hostname or IP address of the management service
    /// - `port`: TCP port
    /// - `api_token`: Session token
    /// - `validate_certs`: Whether the server certificate is verified
    /// - `timeout`: Per-request timeout
    pub fn new(
        host: &str,
        port: u16,
        api_token: impl Into<String>,
        validate_certs: bool,
        timeout: Duration,
    ) -> Result<Self> {
        Self::with_base_url(
            format!("https://{}:{}/api", host, port),
            api_token,
            validate_certs,
            timeout,
        )
    }

    /// Create a transport against an explicit base URL
    ///
    /// Used to point the transport at a local mock server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        validate_certs: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("API token cannot be empty"));
        }

        if !validate_certs {
            tracing::warn!("Server certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!validate_certs)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL every request path is joined to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request and capture status and body
    async fn send(
        &self,
        operation: &'static str,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<RemoteResponse> {
        tracing::debug!("{} {}", operation, path);

        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::http(format!("{} {} failed: {}", operation, path, e)))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            Error::http(format!(
                "{} {} failed reading response body: {}",
                operation, path, e
            ))
        })?;

        tracing::debug!("{} {} returned {}", operation, path, status);
        Ok(RemoteResponse::new(status, decode_body(&text)))
    }
}

/// Decode a response body
///
/// Empty bodies become `null`; bodies that are not JSON are kept as a JSON
/// string so they can still be surfaced in errors.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_collection(&self, path: &str) -> Result<RemoteResponse> {
        let request = self.client.get(self.url(path));
        self.send("GET", path, request).await
    }

    async fn create(&self, path: &str, payload: &Value) -> Result<RemoteResponse> {
        let request = self.client.post(self.url(path)).json(payload);
        self.send("POST", path, request).await
    }

    async fn delete(&self, path: &str) -> Result<RemoteResponse> {
        let request = self.client.delete(self.url(path));
        self.send("DELETE", path, request).await
    }

    fn transport_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for creating HTTP transports
pub struct HttpTransportFactory;

impl TransportFactory for HttpTransportFactory {
    fn create(&self, config: &TransportConfig) -> Result<Box<dyn Transport>> {
        match config {
            TransportConfig::Http {
                host,
                port,
                api_token,
                validate_certs,
                timeout_secs,
            } => {
                config.validate()?;
                Ok(Box::new(HttpTransport::new(
                    host,
                    *port,
                    api_token.clone(),
                    *validate_certs,
                    Duration::from_secs(*timeout_secs),
                )?))
            }
            _ => Err(Error::config("Invalid config for HTTP transport")),
        }
    }
}

/// Register the HTTP transport with a registry
///
/// This function should be called during initialization to make the
/// HTTP transport available.
///
/// # Example
///
/// ```rust
/// use fabric_core::TransportRegistry;
///
/// let registry = TransportRegistry::new();
/// fabric_transport_http::register(&registry);
/// assert!(registry.has_transport("http"));
/// ```
pub fn register(registry: &TransportRegistry) {
    registry.register_transport("http", Box::new(HttpTransportFactory));
}
