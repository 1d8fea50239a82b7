//! Deploy target, outcome, and error types.

use std::fmt;
use std::process::ExitStatus;

use thiserror::Error;

/// Which network the deploy command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkMode {
    Mainnet,
    Testnet,
}

impl NetworkMode {
    /// `"mainnet"` selects mainnet; any other value selects testnet.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "mainnet" {
            Self::Mainnet
        } else {
            Self::Testnet
        }
    }

    pub fn is_mainnet(self) -> bool {
        self == Self::Mainnet
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exit status of a finished deploy command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOutcome {
    /// Process exit code. Signal terminations map to `128 + signal` on unix.
    pub code: i32,
}

impl DeployOutcome {
    pub fn from_code(code: i32) -> Self {
        Self { code }
    }

    pub fn success() -> Self {
        Self::from_code(0)
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

impl From<ExitStatus> for DeployOutcome {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::from_code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::from_code(128 + signal);
            }
        }
        Self::from_code(1)
    }
}

/// Errors raised before a deploy command produced an exit status.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The command could not be started (missing program, bad working dir).
    #[error("failed to spawn deploy command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// No program configured for the network.
    #[error("no deploy command configured for {0}")]
    EmptyCommand(NetworkMode),

    /// The blocking task running the command panicked or was cancelled.
    #[error("deploy task did not complete: {0}")]
    Join(String),
}
