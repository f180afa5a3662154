// # fabricctl - Fabric design reconciler
//
// This is a THIN integration layer only. All reconciliation decisions live
// in fabric-core; this binary never matches, plans or builds payloads.
//
// The fabricctl binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering transports
// 4. Reconciling each declared resource in file order
// 5. Printing one JSON outcome line per resource on stdout
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Management Service
// - `FABRIC_SERVER`: Hostname or IP address (required)
// - `FABRIC_PORT`: TCP port (default 443)
// - `FABRIC_API_TOKEN`: Session token (required)
// - `FABRIC_VALIDATE_CERTS`: Verify the server certificate (default true)
// - `FABRIC_TIMEOUT_SECS`: Per-request timeout (default 30)
//
// ### Run
// - `FABRIC_DECLARATIONS`: Path to the JSON declaration document (required)
// - `FABRIC_MODE`: `live` or `dry-run` (default live)
// - `FABRIC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export FABRIC_SERVER=fabric.example.net
// export FABRIC_API_TOKEN=your_token
// export FABRIC_DECLARATIONS=./lab.json
// export FABRIC_MODE=dry-run
//
// fabricctl
// ```
//
// Processing stops at the first failing resource. Resources reconciled
// before it are not rolled back.

use anyhow::{Context, Result};
use fabric_core::{
    Declarations, EngineConfig, FabricConfig, ReconcileEngine, TransportConfig, TransportRegistry,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Every declared resource reconciled
/// - 1: Configuration, declaration or startup error
/// - 2: Reconciliation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FabricExitCode {
    /// All resources reconciled
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// A resource failed to reconcile
    ReconcileError = 2,
}

impl From<FabricExitCode> for ExitCode {
    fn from(code: FabricExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Live,
    DryRun,
}

/// Application configuration
struct Config {
    server: String,
    port: u16,
    api_token: String,
    validate_certs: bool,
    timeout_secs: u64,
    mode: Mode,
    declarations: String,
    log_level: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("api_token", &"<REDACTED>")
            .field("validate_certs", &self.validate_certs)
            .field("timeout_secs", &self.timeout_secs)
            .field("mode", &self.mode)
            .field("declarations", &self.declarations)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through a variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name).with_context(|| {
                format!("{} is required. Set it via: export {}=...", name, name)
            })
        };

        Ok(Self {
            server: required("FABRIC_SERVER")?,
            port: parse_or("FABRIC_PORT", lookup("FABRIC_PORT"), 443)?,
            api_token: required("FABRIC_API_TOKEN")?,
            validate_certs: match lookup("FABRIC_VALIDATE_CERTS") {
                Some(value) => parse_bool("FABRIC_VALIDATE_CERTS", &value)?,
                None => true,
            },
            timeout_secs: parse_or("FABRIC_TIMEOUT_SECS", lookup("FABRIC_TIMEOUT_SECS"), 30)?,
            mode: match lookup("FABRIC_MODE") {
                Some(value) => parse_mode(&value)?,
                None => Mode::Live,
            },
            declarations: required("FABRIC_DECLARATIONS")?,
            log_level: lookup("FABRIC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            anyhow::bail!("FABRIC_SERVER cannot be empty");
        }

        if self.server.contains("://") || self.server.contains('/') {
            anyhow::bail!(
                "FABRIC_SERVER must be a hostname or IP address, not a URL. Got: {}",
                self.server
            );
        }

        if self.api_token.is_empty() {
            anyhow::bail!(
                "FABRIC_API_TOKEN is required. \
                Set it via: export FABRIC_API_TOKEN=your_token"
            );
        }

        if self.port == 0 {
            anyhow::bail!("FABRIC_PORT must be between 1 and 65535");
        }

        if !(1..=600).contains(&self.timeout_secs) {
            anyhow::bail!(
                "FABRIC_TIMEOUT_SECS must be between 1 and 600 seconds. Got: {}",
                self.timeout_secs
            );
        }

        if self.declarations.is_empty() {
            anyhow::bail!("FABRIC_DECLARATIONS cannot be empty");
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "FABRIC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    /// Library configuration for the transport and engine
    fn fabric_config(&self) -> FabricConfig {
        FabricConfig {
            transport: TransportConfig::Http {
                host: self.server.clone(),
                port: self.port,
                api_token: self.api_token.clone(),
                validate_certs: self.validate_certs,
                timeout_secs: self.timeout_secs,
            },
            engine: match self.mode {
                Mode::Live => EngineConfig::live(),
                Mode::DryRun => EngineConfig::dry_run(),
            },
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, value: Option<String>, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        None => Ok(default),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => anyhow::bail!("{} must be true or false. Got: {}", name, other),
    }
}

fn parse_mode(value: &str) -> Result<Mode> {
    match value.trim().to_lowercase().as_str() {
        "live" => Ok(Mode::Live),
        "dry-run" => Ok(Mode::DryRun),
        other => anyhow::bail!("FABRIC_MODE must be live or dry-run. Got: {}", other),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return FabricExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return FabricExitCode::ConfigError.into();
    }

    // Initialize tracing; stdout carries only outcomes
    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return FabricExitCode::ConfigError.into();
    }

    let declarations = match Declarations::from_file(&config.declarations) {
        Ok(declarations) => declarations,
        Err(e) => {
            error!("{}", e);
            return FabricExitCode::ConfigError.into();
        }
    };

    info!("Starting fabricctl");
    info!(
        "Configuration loaded: {} resource(s) from {}",
        declarations.len(),
        config.declarations
    );
    if config.mode == Mode::DryRun {
        warn!("Running in DRY-RUN mode - no changes will be made");
    }

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{:#}", e);
            return FabricExitCode::ConfigError.into();
        }
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return FabricExitCode::ConfigError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(&engine, &declarations).await {
            error!("Reconciliation error: {:#}", e);
            FabricExitCode::ReconcileError
        } else {
            FabricExitCode::Success
        }
    });

    result.into()
}

/// Build the engine through the transport registry
fn build_engine(config: &Config) -> Result<ReconcileEngine> {
    let fabric_config = config.fabric_config();
    fabric_config.validate()?;

    let registry = TransportRegistry::new();

    #[cfg(feature = "http")]
    {
        info!("Registering HTTP transport");
        fabric_transport_http::register(&registry);
    }

    let transport = registry
        .create_transport(&fabric_config.transport)
        .context("Failed to create transport")?;

    Ok(ReconcileEngine::new(transport, fabric_config.engine))
}

/// Reconcile every declared resource in order, stopping at the first error
async fn run(engine: &ReconcileEngine, declarations: &Declarations) -> Result<()> {
    let mut changed = 0usize;

    for (index, declared) in declarations.resources.iter().enumerate() {
        let outcome = engine.reconcile_declared(declared).await.with_context(|| {
            format!(
                "resource #{} ({} [{}]) failed",
                index + 1,
                declared.kind,
                declared.identity_summary()
            )
        })?;

        if outcome.changed {
            changed += 1;
        }

        let line = serde_json::json!({
            "kind": declared.kind,
            "changed": outcome.changed,
            "data": outcome.data,
        });
        println!("{}", line);
    }

    info!(
        "Reconciled {} resource(s), {} changed",
        declarations.len(),
        changed
    );
    Ok(())
}
