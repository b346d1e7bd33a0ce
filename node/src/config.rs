//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use attest_types::{AlgorithmRef, Identity};
use attest_utils::LogFormat;

use crate::ServiceError;

/// Configuration for an attestation service instance.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Administrator identity, the only caller allowed to mutate allowlists.
    #[serde(default = "default_admin")]
    pub admin: String,

    /// Whether to enable the HTTP API.
    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    /// Address the HTTP API binds to.
    #[serde(default = "default_rpc_bind")]
    pub rpc_bind: String,

    /// HTTP API port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Whether the HTTP API answers cross-origin requests.
    #[serde(default)]
    pub rpc_cors: bool,

    /// Whether to expose the development faucet endpoint.
    #[serde(default)]
    pub enable_faucet: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Capacity of the live event broadcast channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Algorithms approved by the administrator at startup.
    #[serde(default)]
    pub bootstrap_algorithms: Vec<String>,

    /// Verifiers approved by the administrator at startup.
    #[serde(default)]
    pub bootstrap_verifiers: Vec<String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_admin() -> String {
    "admin".to_string()
}

fn default_true() -> bool {
    true
}

fn default_rpc_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_event_channel_capacity() -> usize {
    1024
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ServiceError> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }

    pub fn admin_identity(&self) -> Result<Identity, ServiceError> {
        Identity::parse(self.admin.as_str()).map_err(|e| ServiceError::Config(format!("admin: {e}")))
    }

    pub fn algorithms(&self) -> Result<Vec<AlgorithmRef>, ServiceError> {
        self.bootstrap_algorithms
            .iter()
            .map(|a| {
                AlgorithmRef::parse(a.as_str())
                    .map_err(|e| ServiceError::Config(format!("bootstrap_algorithms: {e}")))
            })
            .collect()
    }

    pub fn verifiers(&self) -> Result<Vec<Identity>, ServiceError> {
        self.bootstrap_verifiers
            .iter()
            .map(|v| {
                Identity::parse(v.as_str())
                    .map_err(|e| ServiceError::Config(format!("bootstrap_verifiers: {e}")))
            })
            .collect()
    }

    pub fn log_format(&self) -> Result<LogFormat, ServiceError> {
        self.log_format.parse().map_err(ServiceError::Config)
    }

    /// Check every field that has a format beyond its type.
    pub fn validate(&self) -> Result<(), ServiceError> {
        self.admin_identity()?;
        self.algorithms()?;
        self.verifiers()?;
        self.log_format()?;
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            enable_rpc: default_true(),
            rpc_bind: default_rpc_bind(),
            rpc_port: default_rpc_port(),
            rpc_cors: false,
            enable_faucet: false,
            log_format: default_log_format(),
            log_level: default_log_level(),
            event_channel_capacity: default_event_channel_capacity(),
            bootstrap_algorithms: Vec::new(),
            bootstrap_verifiers: Vec::new(),
        }
    }
}
