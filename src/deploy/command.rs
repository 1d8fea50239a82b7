//! Deploy command execution.
//!
//! # Responsibilities
//! - Pick the mainnet or testnet command
//! - Run it to completion with the parent's stdin/stdout/stderr
//! - Report its exit status unchanged
//!
//! # Design Decisions
//! - `Deployer::deploy` is blocking by contract; async callers hand it to
//!   the blocking pool and await the result
//! - No retries: a deployment is not idempotent

use std::path::PathBuf;
use std::process::Command;

use crate::config::DeployConfig;
use crate::deploy::types::{DeployError, DeployOutcome, NetworkMode};

/// Something that can run a deployment to completion.
pub trait Deployer: Send + Sync {
    /// Blocks until the deployment finishes.
    fn deploy(&self, network: NetworkMode) -> Result<DeployOutcome, DeployError>;
}

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployCommand {
    program: String,
    args: Vec<String>,
}

impl DeployCommand {
    /// Build from an argv list. Returns `None` for an empty list.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl std::fmt::Display for DeployCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs one of two external commands as a child process.
#[derive(Debug, Clone)]
pub struct CommandDeployer {
    mainnet: DeployCommand,
    testnet: DeployCommand,
    working_dir: Option<PathBuf>,
}

impl CommandDeployer {
    pub fn new(mainnet: DeployCommand, testnet: DeployCommand) -> Self {
        Self {
            mainnet,
            testnet,
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Build from configuration. Fails if either command is empty.
    pub fn from_config(config: &DeployConfig) -> Result<Self, DeployError> {
        let mainnet = DeployCommand::from_argv(&config.mainnet)
            .ok_or(DeployError::EmptyCommand(NetworkMode::Mainnet))?;
        let testnet = DeployCommand::from_argv(&config.testnet)
            .ok_or(DeployError::EmptyCommand(NetworkMode::Testnet))?;

        let deployer = Self::new(mainnet, testnet);
        Ok(match &config.working_dir {
            Some(dir) => deployer.with_working_dir(dir),
            None => deployer,
        })
    }

    pub fn command_for(&self, network: NetworkMode) -> &DeployCommand {
        match network {
            NetworkMode::Mainnet => &self.mainnet,
            NetworkMode::Testnet => &self.testnet,
        }
    }
}

impl Deployer for CommandDeployer {
    fn deploy(&self, network: NetworkMode) -> Result<DeployOutcome, DeployError> {
        let command = self.command_for(network);
        tracing::info!(%network, command = %command, "Running deploy command");

        let mut child = Command::new(command.program());
        child.args(command.args());
        if let Some(dir) = &self.working_dir {
            child.current_dir(dir);
        }

        // `status()` inherits stdio, so deploy logs reach the operator untouched.
        let status = child.status().map_err(|source| DeployError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let outcome = DeployOutcome::from(status);
        if outcome.is_success() {
            tracing::info!(%network, "Deploy command succeeded");
        } else {
            tracing::error!(%network, code = outcome.code, "Deploy command failed");
        }
        Ok(outcome)
    }
}
