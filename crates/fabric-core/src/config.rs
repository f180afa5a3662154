//! Configuration types for the fabric reconciliation system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Transport configuration
    pub transport: TransportConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl FabricConfig {
    /// Create a configuration around a transport with default engine settings
    pub fn new(transport: TransportConfig) -> Self {
        Self {
            transport,
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.transport.validate()
    }
}

/// Transport configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    /// HTTPS REST transport
    Http {
        /// DNS hostname or IP address of the management service
        host: String,
        /// TCP port of the management service
        #[serde(default = "default_port")]
        port: u16,
        /// Bearer token used to authenticate
        api_token: String,
        /// Whether the server certificate is verified
        #[serde(default = "default_validate_certs")]
        validate_certs: bool,
        /// Request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom transport
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl TransportConfig {
    /// HTTP transport with default port, certificate validation and timeout
    pub fn http(host: impl Into<String>, api_token: impl Into<String>) -> Self {
        TransportConfig::Http {
            host: host.into(),
            port: default_port(),
            api_token: api_token.into(),
            validate_certs: default_validate_certs(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate the transport configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            TransportConfig::Http {
                host,
                port,
                api_token,
                timeout_secs,
                ..
            } => {
                if host.is_empty() {
                    return Err(crate::Error::config("Transport host cannot be empty"));
                }
                if *port == 0 {
                    return Err(crate::Error::config("Transport port must be > 0"));
                }
                if api_token.is_empty() {
                    return Err(crate::Error::config("API token cannot be empty"));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("Transport timeout must be > 0"));
                }
                Ok(())
            }
            TransportConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom transport factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom transport config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the transport type name
    pub fn type_name(&self) -> &str {
        match self {
            TransportConfig::Http { .. } => "http",
            TransportConfig::Custom { factory, .. } => factory,
        }
    }
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportConfig::Http {
                host,
                port,
                validate_certs,
                timeout_secs,
                ..
            } => f
                .debug_struct("Http")
                .field("host", host)
                .field("port", port)
                .field("api_token", &"<REDACTED>")
                .field("validate_certs", validate_certs)
                .field("timeout_secs", timeout_secs)
                .finish(),
            TransportConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Plan mutations without issuing them
    ///
    /// Reads still hit the remote service. Create and delete branches report
    /// `changed = true` with the request that would have been sent.
    #[serde(default)]
    pub dry_run: bool,
}

impl EngineConfig {
    /// Engine settings for live mode
    pub fn live() -> Self {
        Self { dry_run: false }
    }

    /// Engine settings for dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

fn default_port() -> u16 {
    443
}

fn default_validate_certs() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}
