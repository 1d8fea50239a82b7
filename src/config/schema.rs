//! Configuration schema definitions.
//!
//! This module defines the file-backed configuration for the watcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gas-gated deployer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    /// RPC endpoints and polling settings.
    pub rpc: RpcConfig,

    /// Deploy commands per network.
    pub deploy: DeployConfig,

    /// Backoff settings for provider failures.
    pub retries: RetryConfig,

    /// Limits on how long to wait for a qualifying gas price.
    pub watch: WatchConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL used for gas price queries.
    pub http_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Websocket endpoint for `newHeads` subscriptions. Falls back to
    /// HTTP polling when unset.
    pub ws_url: Option<String>,

    /// Expected chain ID (e.g., 1 for Ethereum mainnet). Checked once at startup.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Block polling interval in milliseconds (HTTP mode only).
    pub poll_interval_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            http_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            ws_url: None,
            chain_id: None,
            rpc_timeout_secs: 10,
            poll_interval_ms: 4000,
        }
    }
}

/// Deploy command configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Program and arguments run for a mainnet deploy.
    pub mainnet: Vec<String>,

    /// Program and arguments run for a testnet deploy.
    pub testnet: Vec<String>,

    /// Working directory for the deploy command. Inherits the current one when unset.
    pub working_dir: Option<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            mainnet: vec!["npm".into(), "run".into(), "deploy".into()],
            testnet: vec!["npm".into(), "run".into(), "testdeploy".into()],
            working_dir: None,
        }
    }
}

/// Retry configuration for RPC calls and subscriptions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of consecutive attempts before giving up.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

/// Watch loop limits.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WatchConfig {
    /// Give up after this many seconds without a deploy. Waits forever when unset.
    pub max_wait_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
