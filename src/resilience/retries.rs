//! Retry logic for provider calls.
//!
//! # Responsibilities
//! - Re-run a failed read-only RPC call with exponential backoff + jitter
//! - Give up after a fixed number of consecutive attempts
//!
//! # Design Decisions
//! - Only idempotent reads go through here; the deploy command never does
//! - The last error is kept so the operator sees the real cause

use std::future::Future;

use tokio::time::sleep;

use crate::blockchain::{BlockchainError, BlockchainResult};
use crate::config::RetryConfig;
use crate::resilience::backoff::Backoff;

/// Run `op` until it succeeds or `config.max_attempts` attempts have failed.
pub async fn retry_with_backoff<T, F, Fut>(
    operation: &'static str,
    config: &RetryConfig,
    mut op: F,
) -> BlockchainResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BlockchainResult<T>>,
{
    let backoff = Backoff::from_config(config);
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                return Err(BlockchainError::Exhausted {
                    operation,
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                let delay = backoff.delay(attempt);
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Provider call failed, retrying"
                );
                sleep(delay).await;
            }
        }
    }
}
