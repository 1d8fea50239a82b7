//! Block subscription pump.

use futures_util::StreamExt;
use tokio::sync::{broadcast, mpsc};
use tokio::time::sleep;

use crate::blockchain::{BlockNotification, BlockSource, BlockchainError, BlockchainResult};
use crate::config::RetryConfig;
use crate::gate::RunStateCell;
use crate::observability::metrics;
use crate::resilience::Backoff;

/// Forwards new-block notifications into a channel while the run is watching.
pub struct BlockWatcher<S> {
    source: S,
    state: RunStateCell,
    backoff: Backoff,
    max_attempts: u32,
}

impl<S: BlockSource> BlockWatcher<S> {
    pub fn new(source: S, state: RunStateCell, retries: &RetryConfig) -> Self {
        Self {
            source,
            state,
            backoff: Backoff::from_config(retries),
            max_attempts: retries.max_attempts.max(1),
        }
    }

    /// Pump notifications until the run leaves `Watching`, shutdown fires,
    /// the receiver is dropped, or resubscribing fails `max_attempts` times
    /// in a row.
    pub async fn run(
        self,
        tx: mpsc::UnboundedSender<BlockNotification>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> BlockchainResult<()> {
        let mut failures = 0u32;

        loop {
            if !self.state.is_watching() {
                return Ok(());
            }

            let subscribed = tokio::select! {
                _ = shutdown.recv() => return Ok(()),
                result = self.source.subscribe() => result,
            };

            let error = match subscribed {
                Ok(mut stream) => {
                    tracing::info!("Block subscription established");
                    loop {
                        let next = tokio::select! {
                            _ = shutdown.recv() => return Ok(()),
                            next = stream.next() => next,
                        };
                        let Some(block) = next else {
                            break BlockchainError::Subscription("block stream ended".to_string());
                        };
                        if !self.state.is_watching() {
                            tracing::debug!(block = block.number, "Run no longer watching, dropping block");
                            return Ok(());
                        }
                        failures = 0;
                        metrics::record_block();
                        if tx.send(block).is_err() {
                            return Ok(());
                        }
                    }
                }
                Err(e) => e,
            };

            failures += 1;
            if failures >= self.max_attempts {
                return Err(BlockchainError::Exhausted {
                    operation: "block subscription",
                    attempts: failures,
                    last: Box::new(error),
                });
            }

            let delay = self.backoff.delay(failures);
            tracing::warn!(
                attempt = failures,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Block subscription lost, resubscribing"
            );
            tokio::select! {
                _ = shutdown.recv() => return Ok(()),
                _ = sleep(delay) => {}
            }
        }
    }
}
