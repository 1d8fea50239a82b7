//! Deploy trigger subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkMode
//!     → command.rs (select mainnet/testnet argv, spawn, wait)
//!     → DeployOutcome (child exit code) or DeployError (could not spawn)
//! ```

pub mod command;
pub mod types;

pub use command::{CommandDeployer, DeployCommand, Deployer};
pub use types::{DeployError, DeployOutcome, NetworkMode};
