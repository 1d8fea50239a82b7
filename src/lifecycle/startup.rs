//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration, apply CLI/env overrides
//! - Resolve gas limit and network (arguments or prompt)
//! - Connect to the provider and build the deployer
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Everything that can be rejected locally is checked before the first
//!   network connection is opened

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::{
    AnyBlockSource, BlockchainClient, BlockchainError, PollingBlockSource, WsBlockSource,
};
use crate::cli::Cli;
use crate::config::validation::validate_config;
use crate::config::{load_config, ConfigError, RunConfig, WatcherConfig};
use crate::deploy::{CommandDeployer, Deployer};
use crate::error::RunError;

/// Fully resolved settings, ready for `connect`.
#[derive(Debug, Clone)]
pub struct Startup {
    pub run: RunConfig,
    pub watcher: WatcherConfig,
}

/// Provider-facing parts of a run.
pub struct Components<P, S> {
    pub prices: P,
    pub blocks: S,
    pub deployer: Arc<dyn Deployer>,
}

/// Resolve configuration and run settings. Makes no network calls.
pub fn prepare<R: BufRead, W: Write>(
    cli: &Cli,
    input: R,
    output: W,
) -> Result<Startup, RunError> {
    let mut watcher = match &cli.config {
        Some(path) => load_config(path)?,
        None => WatcherConfig::default(),
    };

    if let Some(url) = &cli.rpc_url {
        watcher.rpc.http_url = url.clone();
    }
    if let Some(url) = &cli.ws_url {
        watcher.rpc.ws_url = Some(url.clone());
    }
    if let Some(secs) = cli.max_wait_secs {
        watcher.watch.max_wait_secs = Some(secs);
    }
    validate_config(&watcher).map_err(ConfigError::Validation)?;

    let run = cli
        .run_config(input, output)?
        .with_max_wait(watcher.watch.max_wait_secs.map(Duration::from_secs));

    Ok(Startup { run, watcher })
}

/// Open the RPC client, pick the block source, and build the deployer.
pub async fn connect(
    config: WatcherConfig,
) -> Result<Components<BlockchainClient, AnyBlockSource>, RunError> {
    let client = BlockchainClient::new(config.rpc.clone())?;

    match client.verify_chain_id().await {
        Ok(()) => {}
        Err(e @ BlockchainError::ChainMismatch { .. }) => return Err(e.into()),
        Err(e) => tracing::warn!(error = %e, "Could not verify chain ID, continuing"),
    }

    let blocks = match &config.rpc.ws_url {
        Some(url) => {
            tracing::info!(url = %url, "Using websocket block subscription");
            AnyBlockSource::Ws(WsBlockSource::new(url.clone()))
        }
        None => {
            tracing::info!(
                interval_ms = config.rpc.poll_interval_ms,
                "No websocket URL configured, polling for new blocks"
            );
            AnyBlockSource::Polling(PollingBlockSource::new(
                client.clone(),
                Duration::from_millis(config.rpc.poll_interval_ms),
            ))
        }
    };

    let deployer = CommandDeployer::from_config(&config.deploy)?;

    Ok(Components {
        prices: client,
        blocks,
        deployer: Arc::new(deployer),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::NetworkMode;
    use crate::gate::GasThreshold;
    use clap::Parser;
    use std::io;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("deploy-under-gas").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_prepare_with_defaults() {
        let startup = prepare(&cli(&["20", "mainnet"]), io::empty(), io::sink()).unwrap();
        assert_eq!(startup.run.threshold, GasThreshold::from_gwei(20));
        assert_eq!(startup.run.network, NetworkMode::Mainnet);
        assert_eq!(startup.run.max_wait, None);
        assert_eq!(startup.watcher.rpc.http_url, "http://localhost:8545");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[rpc]\nhttp_url = \"https://from-file.example\"\n[watch]\nmax_wait_secs = 900"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let startup = prepare(
            &cli(&[
                "-c",
                path,
                "--ws-url",
                "wss://eth.example/ws",
                "--max-wait-secs",
                "30",
                "12.5",
            ]),
            io::empty(),
            io::sink(),
        )
        .unwrap();

        assert_eq!(startup.watcher.rpc.http_url, "https://from-file.example");
        assert_eq!(startup.watcher.rpc.ws_url.as_deref(), Some("wss://eth.example/ws"));
        assert_eq!(startup.run.max_wait, Some(Duration::from_secs(30)));
        assert_eq!(startup.run.threshold, GasThreshold::parse("12.5").unwrap());
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let err = prepare(
            &cli(&["--rpc-url", "ftp://nope", "20"]),
            io::empty(),
            io::sink(),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Config(ConfigError::Validation(_))));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_limit_is_config_error() {
        let err = prepare(&cli(&["abc"]), io::empty(), io::sink()).unwrap_err();
        assert!(matches!(err, RunError::Invocation(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
