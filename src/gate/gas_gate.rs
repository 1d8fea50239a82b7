//! Per-block gas check and one-shot deploy trigger.

use std::sync::Arc;

use crate::blockchain::{BlockNotification, GasPrice, GasPriceSource};
use crate::config::{RetryConfig, RunConfig};
use crate::deploy::{DeployError, Deployer, NetworkMode};
use crate::gate::state::RunStateCell;
use crate::gate::types::{GasThreshold, GateDecision, GateError};
use crate::observability::metrics;
use crate::resilience::retry_with_backoff;

/// Decides on each block whether to deploy.
pub struct GasGate<P> {
    prices: P,
    deployer: Arc<dyn Deployer>,
    threshold: GasThreshold,
    network: NetworkMode,
    retries: RetryConfig,
    state: RunStateCell,
}

impl<P: GasPriceSource> GasGate<P> {
    pub fn new(config: &RunConfig, prices: P, deployer: Arc<dyn Deployer>) -> Self {
        Self {
            prices,
            deployer,
            threshold: config.threshold,
            network: config.network,
            retries: RetryConfig::default(),
            state: RunStateCell::new(),
        }
    }

    /// Backoff policy for failed gas price fetches.
    pub fn with_retries(mut self, retries: RetryConfig) -> Self {
        self.retries = retries;
        self
    }

    /// Handle to the gate's run state, for the block watcher.
    pub fn state(&self) -> RunStateCell {
        self.state.clone()
    }

    /// Fetch the gas price and deploy if it is below the limit.
    ///
    /// Safe to call concurrently: the Watching → Triggered transition is a
    /// single compare-and-swap taken after the fetch completes, so only one
    /// caller ever reaches the deployer. The deployer runs on the blocking
    /// pool and this call waits for it.
    pub async fn check_gas(&self, block: BlockNotification) -> Result<GateDecision, GateError> {
        self.check_gas_with(block, |_| {}).await
    }

    /// Like [`GasGate::check_gas`], but calls `on_trigger` with the winning
    /// price after the transition and before the deploy command starts.
    pub async fn check_gas_with<F>(
        &self,
        block: BlockNotification,
        on_trigger: F,
    ) -> Result<GateDecision, GateError>
    where
        F: FnOnce(GasPrice),
    {
        if !self.state.is_watching() {
            return Ok(GateDecision::Ignored);
        }

        let price =
            retry_with_backoff("eth_gasPrice", &self.retries, || self.prices.gas_price()).await?;
        metrics::record_gas_price(price);

        if !self.threshold.admits(price) {
            tracing::debug!(
                block = block.number,
                gwei = price.gwei_f64(),
                "Gas price at or above limit"
            );
            return Ok(GateDecision::Waiting { price });
        }

        if !self.state.try_trigger() {
            return Ok(GateDecision::Ignored);
        }

        tracing::info!(
            block = block.number,
            gwei = price.gwei_f64(),
            threshold = %self.threshold,
            network = %self.network,
            "Gas price below limit, deploying now"
        );
        on_trigger(price);

        let deployer = Arc::clone(&self.deployer);
        let network = self.network;
        let joined = tokio::task::spawn_blocking(move || deployer.deploy(network)).await;
        self.state.finish();

        let outcome = joined.map_err(|e| DeployError::Join(e.to_string()))??;
        metrics::record_deploy(network, outcome.is_success());

        Ok(GateDecision::Deployed { price, outcome })
    }
}
