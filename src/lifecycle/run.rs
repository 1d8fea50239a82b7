//! The watch loop: blocks in, at most one deploy out.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};

use crate::blockchain::{BlockSource, BlockchainError, GasPrice, GasPriceSource};
use crate::config::{RetryConfig, RunConfig, WatcherConfig};
use crate::deploy::DeployOutcome;
use crate::error::{deploy_exit_code, RunError, EXIT_TIMED_OUT};
use crate::gate::{GasGate, GateDecision};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::startup::{Components, Startup};
use crate::observability::StatusLine;
use crate::watcher::BlockWatcher;

/// How a run ended, when it ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The deploy command ran (successfully or not).
    Deployed {
        block: u64,
        price: GasPrice,
        outcome: DeployOutcome,
    },
    /// The maximum wait elapsed first.
    TimedOut { waited: Duration },
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Deployed { outcome, .. } => deploy_exit_code(outcome.code),
            Self::TimedOut { .. } => EXIT_TIMED_OUT,
        }
    }
}

/// Connect, then watch until a deploy has run or the wait runs out.
///
/// `connect` is only called after `startup` is fully resolved, so an
/// invalid limit never opens a provider connection.
pub async fn launch<C, Fut, P, S>(
    startup: Startup,
    connect: C,
    status: &mut StatusLine,
) -> Result<RunOutcome, RunError>
where
    C: FnOnce(WatcherConfig) -> Fut,
    Fut: Future<Output = Result<Components<P, S>, RunError>>,
    P: GasPriceSource,
    S: BlockSource,
{
    let Startup { run, watcher } = startup;
    let retries = watcher.retries.clone();

    tracing::info!(
        threshold = %run.threshold,
        network = %run.network,
        max_wait_secs = run.max_wait.map(|d| d.as_secs()),
        "Waiting for gas price to drop below limit"
    );

    let Components {
        prices,
        blocks,
        deployer,
    } = connect(watcher).await?;
    let gate = GasGate::new(&run, prices, deployer).with_retries(retries.clone());

    watch_and_deploy(&run, gate, blocks, &retries, status).await
}

/// Feed every new block to `gate` until it deploys.
///
/// The block watcher runs as its own task and is stopped before this
/// returns. Blocks are checked one at a time in arrival order.
pub async fn watch_and_deploy<P, S>(
    run: &RunConfig,
    gate: GasGate<P>,
    blocks: S,
    retries: &RetryConfig,
    status: &mut StatusLine,
) -> Result<RunOutcome, RunError>
where
    P: GasPriceSource,
    S: BlockSource,
{
    let shutdown = Shutdown::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let watcher = BlockWatcher::new(blocks, gate.state(), retries);
    let handle = tokio::spawn(watcher.run(tx, shutdown.subscribe()));

    let started = Instant::now();
    let deadline = run.max_wait.map(|wait| started + wait);

    // `None` means the watcher hung up on its own.
    let finished: Option<Result<RunOutcome, RunError>> = loop {
        let next = match deadline {
            Some(deadline) => match timeout_at(deadline, rx.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    break Some(Ok(RunOutcome::TimedOut {
                        waited: started.elapsed(),
                    }))
                }
            },
            None => rx.recv().await,
        };
        let Some(block) = next else {
            break None;
        };

        // The deploy command shares the terminal, so close the status line first.
        let end_status = |price: GasPrice| {
            status.update(block.number, price);
            status.finish();
        };
        let decision = gate.check_gas_with(block, end_status).await;
        match decision {
            Ok(GateDecision::Waiting { price }) => status.update(block.number, price),
            Ok(GateDecision::Deployed { price, outcome }) => {
                break Some(Ok(RunOutcome::Deployed {
                    block: block.number,
                    price,
                    outcome,
                }))
            }
            Ok(GateDecision::Ignored) => {}
            Err(e) => break Some(Err(e.into())),
        }
    };

    status.finish();
    shutdown.trigger();
    let watched = handle.await;

    match finished {
        Some(result) => {
            if let Ok(Err(e)) = &watched {
                tracing::debug!(error = %e, "Block watcher stopped with error after run ended");
            }
            if let Ok(RunOutcome::TimedOut { waited }) = &result {
                tracing::warn!(
                    waited_secs = waited.as_secs(),
                    "Gave up waiting for gas price to drop"
                );
            }
            result
        }
        None => Err(RunError::Provider(match watched {
            Ok(Err(e)) => e,
            Ok(Ok(())) => {
                BlockchainError::Subscription("block watcher stopped unexpectedly".to_string())
            }
            Err(e) => BlockchainError::Subscription(format!("block watcher task failed: {e}")),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{BlockNotification, BlockStream, BlockchainResult};
    use crate::deploy::{DeployError, Deployer, NetworkMode};
    use crate::gate::GasThreshold;
    use futures_util::{stream, StreamExt};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct Price(u64);

    impl GasPriceSource for Price {
        async fn gas_price(&self) -> BlockchainResult<GasPrice> {
            Ok(GasPrice::from_gwei(self.0))
        }
    }

    struct Ticks(Vec<u64>);

    impl BlockSource for Ticks {
        async fn subscribe(&self) -> BlockchainResult<BlockStream> {
            let blocks: Vec<_> = self
                .0
                .iter()
                .map(|&number| BlockNotification { number })
                .collect();
            Ok(stream::iter(blocks).chain(stream::pending()).boxed())
        }
    }

    struct Broken;

    impl BlockSource for Broken {
        async fn subscribe(&self) -> BlockchainResult<BlockStream> {
            Err(BlockchainError::Subscription("connection reset".into()))
        }
    }

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl Deployer for Counting {
        fn deploy(&self, _network: NetworkMode) -> Result<DeployOutcome, DeployError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(DeployOutcome::success())
        }
    }

    /// Stands in for the terminal shared by the status line and the child.
    #[derive(Clone, Default)]
    struct Terminal(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Terminal {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Noisy(Arc<Mutex<Vec<u8>>>);

    impl Deployer for Noisy {
        fn deploy(&self, _network: NetworkMode) -> Result<DeployOutcome, DeployError> {
            self.0.lock().unwrap().extend_from_slice(b"deploying...\n");
            Ok(DeployOutcome::success())
        }
    }

    fn retries() -> RetryConfig {
        RetryConfig {
            max_attempts: 2,
            base_delay_ms: 1,
            max_delay_ms: 1,
        }
    }

    fn run_config(max_wait: Option<Duration>) -> RunConfig {
        RunConfig::new(GasThreshold::from_gwei(20), NetworkMode::Testnet).with_max_wait(max_wait)
    }

    #[test]
    fn test_exit_codes() {
        let deployed = |code| RunOutcome::Deployed {
            block: 1,
            price: GasPrice::from_gwei(1),
            outcome: DeployOutcome::from_code(code),
        };
        assert_eq!(deployed(0).exit_code(), 0);
        assert_eq!(deployed(2).exit_code(), 2);
        assert_eq!(
            RunOutcome::TimedOut {
                waited: Duration::from_secs(5)
            }
            .exit_code(),
            124
        );
    }

    #[tokio::test]
    async fn test_deploys_on_first_cheap_block() {
        let deployer = Arc::new(Counting::default());
        let config = run_config(None);
        let gate = GasGate::new(&config, Price(3), deployer.clone()).with_retries(retries());

        let outcome = watch_and_deploy(
            &config,
            gate,
            Ticks(vec![41, 42]),
            &retries(),
            &mut StatusLine::sink(),
        )
        .await
        .unwrap();

        assert!(matches!(outcome, RunOutcome::Deployed { block: 41, .. }));
        assert_eq!(deployer.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_times_out_while_expensive() {
        let deployer = Arc::new(Counting::default());
        let config = run_config(Some(Duration::from_millis(50)));
        let gate = GasGate::new(&config, Price(90), deployer.clone()).with_retries(retries());

        let outcome = watch_and_deploy(
            &config,
            gate,
            Ticks(vec![1, 2, 3]),
            &retries(),
            &mut StatusLine::sink(),
        )
        .await
        .unwrap();

        assert!(matches!(outcome, RunOutcome::TimedOut { .. }));
        assert_eq!(outcome.exit_code(), EXIT_TIMED_OUT);
        assert_eq!(deployer.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lost_subscription_is_provider_error() {
        let deployer = Arc::new(Counting::default());
        let config = run_config(None);
        let gate = GasGate::new(&config, Price(3), deployer.clone()).with_retries(retries());

        let err = watch_and_deploy(&config, gate, Broken, &retries(), &mut StatusLine::sink())
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Provider(BlockchainError::Exhausted { .. })));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(deployer.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_status_line_ends_before_deploy_output() {
        let terminal = Terminal::default();
        let config = run_config(None);
        let gate = GasGate::new(&config, Price(3), Arc::new(Noisy(terminal.0.clone())))
            .with_retries(retries());
        let mut status = StatusLine::new(terminal.clone());

        watch_and_deploy(&config, gate, Ticks(vec![41]), &retries(), &mut status)
            .await
            .unwrap();

        let written = String::from_utf8(terminal.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "\r\x1b[2Kblock 41: 3.000000000 gwei\ndeploying...\n");
    }
}
