//! Per-run settings resolved from the command line.

use std::time::Duration;

use crate::deploy::NetworkMode;
use crate::gate::GasThreshold;

/// Immutable settings for one watcher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Deploy once the network gas price drops strictly below this.
    pub threshold: GasThreshold,

    /// Which deploy command to run.
    pub network: NetworkMode,

    /// Stop waiting after this long. `None` waits forever.
    pub max_wait: Option<Duration>,
}

impl RunConfig {
    pub fn new(threshold: GasThreshold, network: NetworkMode) -> Self {
        Self {
            threshold,
            network,
            max_wait: None,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }
}
