//! Top-level error type and process exit codes.

use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::config::ConfigError;
use crate::cli::InvocationError;
use crate::deploy::DeployError;
use crate::gate::GateError;

/// Invalid gas limit or configuration.
pub const EXIT_CONFIG: u8 = 1;
/// Provider unreachable after retries, or wrong chain.
pub const EXIT_PROVIDER: u8 = 3;
/// No qualifying gas price before the maximum wait elapsed.
pub const EXIT_TIMED_OUT: u8 = 124;
/// The deploy task panicked or was cancelled before reporting a status.
pub const EXIT_DEPLOY_ABORTED: u8 = 125;
/// Deploy command could not be started.
pub const EXIT_SPAWN: u8 = 127;

/// Anything that ends a run without a deploy exit status.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] BlockchainError),

    #[error("Deploy error: {0}")]
    Deploy(#[from] DeployError),
}

impl From<GateError> for RunError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Provider(e) => Self::Provider(e),
            GateError::Deploy(e) => Self::Deploy(e),
        }
    }
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Invocation(_) | Self::Config(_) => EXIT_CONFIG,
            Self::Provider(_) => EXIT_PROVIDER,
            Self::Deploy(DeployError::Spawn { .. }) => EXIT_SPAWN,
            Self::Deploy(DeployError::EmptyCommand(_)) => EXIT_CONFIG,
            Self::Deploy(DeployError::Join(_)) => EXIT_DEPLOY_ABORTED,
        }
    }
}

/// Map a child exit code onto a process exit code: 0 stays 0, anything
/// else keeps its low byte and never collapses to 0.
pub fn deploy_exit_code(code: i32) -> u8 {
    if code == 0 {
        return 0;
    }
    match (code & 0xff) as u8 {
        0 => 1,
        low => low,
    }
}
