//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! RpcConfig (HTTP URL + failovers, optional websocket URL)
//!     → client.rs (HTTP RPC with timeouts and failover: gas price, head block)
//!     → blocks.rs (newHeads subscription or head polling)
//!     → source.rs traits consumed by the gate and the block watcher
//! ```
//!
//! # Constraints
//! - All RPC calls have configurable timeouts
//! - Nothing here retries on its own; callers own the backoff policy

pub mod blocks;
pub mod client;
pub mod source;
pub mod types;

pub use blocks::{AnyBlockSource, PollingBlockSource, WsBlockSource};
pub use client::BlockchainClient;
pub use source::{BlockSource, BlockStream, GasPriceSource};
pub use types::{BlockNotification, BlockchainError, BlockchainResult, ChainId, GasPrice};
