//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default QuickBooks Online API base URL (sandbox).
///
/// Production companies use `https://quickbooks.api.intuit.com`.
const DEFAULT_QBO_BASE_URL: &str = "https://sandbox-quickbooks.api.intuit.com";

/// Default `minorversion` query parameter sent with every API call.
const DEFAULT_QBO_MINOR_VERSION: &str = "75";

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// QuickBooks Online connection configuration.
    pub qbo: QboConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the QuickBooks Online connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct QboConfig {
    /// Company (realm) ID the server operates on.
    pub realm_id: Option<String>,

    /// OAuth2 bearer token. Obtaining and refreshing tokens happens outside
    /// this server; a fresh token is provided through the environment.
    pub access_token: Option<String>,

    /// API base URL. Defaults to the Intuit sandbox host.
    pub base_url: String,

    /// `minorversion` value appended to every API request.
    pub minor_version: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for QboConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QboConfig")
            .field("realm_id", &self.realm_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("minor_version", &self.minor_version)
            .finish()
    }
}

impl Default for QboConfig {
    fn default() -> Self {
        Self {
            realm_id: None,
            access_token: None,
            base_url: DEFAULT_QBO_BASE_URL.to_string(),
            minor_version: DEFAULT_QBO_MINOR_VERSION.to_string(),
        }
    }
}

impl QboConfig {
    /// Whether both the realm ID and an access token are present.
    ///
    /// The server starts without them; tool calls that need the API report
    /// the missing pieces per call instead.
    pub fn is_complete(&self) -> bool {
        self.realm_id.is_some() && self.access_token.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "qbo-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            qbo: QboConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_QBO_REALM_ID`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Load QuickBooks Online connection settings
        if let Ok(realm_id) = std::env::var("MCP_QBO_REALM_ID") {
            config.qbo.realm_id = Some(realm_id);
        }

        if let Ok(token) = std::env::var("MCP_QBO_ACCESS_TOKEN") {
            config.qbo.access_token = Some(token);
            info!("QuickBooks access token loaded from environment");
        }

        if let Ok(base_url) = std::env::var("MCP_QBO_BASE_URL") {
            config.qbo.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(minor_version) = std::env::var("MCP_QBO_MINOR_VERSION") {
            config.qbo.minor_version = minor_version;
        }

        if !config.qbo.is_complete() {
            warn!(
                "QuickBooks connection is not configured. Set MCP_QBO_REALM_ID and \
                 MCP_QBO_ACCESS_TOKEN to enable API-backed tools."
            );
        }

        config
    }
}
