//! Chain-specific types and error definitions.

use std::fmt;

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// A gas price observed on the network, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GasPrice(u128);

impl GasPrice {
    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    /// Whole gwei amount; convenient for tests and fixtures.
    pub const fn from_gwei(gwei: u64) -> Self {
        Self(gwei as u128 * 1_000_000_000)
    }

    pub const fn wei(self) -> u128 {
        self.0
    }

    /// Approximate gwei value for logs and metrics. Comparisons use [`GasPrice::wei`].
    pub fn gwei_f64(self) -> f64 {
        self.0 as f64 / 1e9
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format_units(U256::from(self.0), "gwei") {
            Ok(gwei) => write!(f, "{gwei} gwei"),
            Err(_) => write!(f, "{} wei", self.0),
        }
    }
}

/// A new-block notification pushed by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockNotification {
    pub number: u64,
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Block subscription could not be established or was lost.
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Retries exhausted.
    #[error("{operation} failed after {attempts} attempts: {last}")]
    Exhausted {
        operation: &'static str,
        attempts: u32,
        last: Box<BlockchainError>,
    },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
