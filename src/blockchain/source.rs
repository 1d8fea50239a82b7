//! Provider capabilities consumed by the gate and the block watcher.
//!
//! Both traits are implemented by the real RPC-backed types in this module
//! tree and by scripted doubles in tests.

use std::future::Future;

use futures_util::stream::BoxStream;

use crate::blockchain::types::{BlockNotification, BlockchainResult, GasPrice};

/// Stream of new-block notifications produced by one subscription.
pub type BlockStream = BoxStream<'static, BlockNotification>;

/// Current network gas price query.
pub trait GasPriceSource: Send + Sync {
    fn gas_price(&self) -> impl Future<Output = BlockchainResult<GasPrice>> + Send;
}

/// New-block subscription.
///
/// Each call to `subscribe` opens a fresh subscription. The stream ending
/// means the subscription was lost; the watcher decides whether to reopen it.
pub trait BlockSource: Send + Sync + 'static {
    fn subscribe(&self) -> impl Future<Output = BlockchainResult<BlockStream>> + Send;
}
