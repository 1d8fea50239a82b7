//! Command-line interface.
//!
//! Two invocation modes, exactly one per run:
//! - positional: `deploy-under-gas <gas_limit_gwei> [network]`
//! - interactive: no positional arguments, answers read from stdin

pub mod prompt;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::cli::prompt::{ask_run_settings, PromptError};
use crate::config::RunConfig;
use crate::deploy::NetworkMode;
use crate::gate::{GasThreshold, ThresholdError};

#[derive(Debug, Parser)]
#[command(name = "deploy-under-gas")]
#[command(about = "Wait for the gas price to drop below a limit, then run the deploy script once")]
pub struct Cli {
    /// Gas price limit in gwei (fractions allowed). Prompts when omitted.
    #[arg(allow_negative_numbers = true)]
    pub gas_limit: Option<String>,

    /// Target network: "mainnet" deploys to mainnet, anything else to testnet.
    pub network: Option<String>,

    /// TOML configuration file.
    #[arg(short, long, env = "DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP JSON-RPC endpoint (overrides rpc.http_url).
    #[arg(long, env = "DEPLOY_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Websocket endpoint for block subscriptions (overrides rpc.ws_url).
    #[arg(long, env = "DEPLOY_WS_URL")]
    pub ws_url: Option<String>,

    /// Give up after this many seconds without deploying (overrides watch.max_wait_secs).
    #[arg(long)]
    pub max_wait_secs: Option<u64>,
}

/// The gas limit or network could not be determined.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Invalid limit: {0}")]
    InvalidLimit(#[from] ThresholdError),

    #[error("Interactive prompt failed: {0}")]
    Prompt(PromptError),
}

impl From<PromptError> for InvocationError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Threshold(e) => Self::InvalidLimit(e),
            other => Self::Prompt(other),
        }
    }
}

impl Cli {
    /// Resolve threshold and network from arguments, or prompt when none were given.
    pub fn run_config<R: BufRead, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<RunConfig, InvocationError> {
        let (network, threshold) = match &self.gas_limit {
            Some(limit) => (
                NetworkMode::from_arg(self.network.as_deref().unwrap_or_default()),
                GasThreshold::parse(limit)?,
            ),
            None => ask_run_settings(input, output)?,
        };
        Ok(RunConfig::new(threshold, network))
    }
}
