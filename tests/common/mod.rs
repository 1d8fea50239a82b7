//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use clap::Parser;
use futures_util::{stream, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use deploy_under_gas::blockchain::{
    BlockNotification, BlockSource, BlockStream, BlockchainError, BlockchainResult, GasPrice,
    GasPriceSource,
};
use deploy_under_gas::cli::Cli;
use deploy_under_gas::config::{RetryConfig, WatcherConfig};
use deploy_under_gas::deploy::{DeployError, DeployOutcome, Deployer, NetworkMode};
use deploy_under_gas::error::RunError;
use deploy_under_gas::lifecycle::{launch, prepare, Components};
use deploy_under_gas::observability::StatusLine;

/// Gas prices handed out in order; the last one repeats forever.
#[derive(Clone)]
pub struct ScriptedPrices {
    prices: Arc<Mutex<VecDeque<u64>>>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedPrices {
    pub fn gwei(prices: &[u64]) -> Self {
        Self {
            prices: Arc::new(Mutex::new(prices.iter().copied().collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl GasPriceSource for ScriptedPrices {
    async fn gas_price(&self) -> BlockchainResult<GasPrice> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut prices = self.prices.lock().unwrap();
        let gwei = if prices.len() > 1 {
            prices.pop_front().unwrap()
        } else {
            *prices.front().unwrap()
        };
        Ok(GasPrice::from_gwei(gwei))
    }
}

/// Provider that never answers.
pub struct DownProvider;

impl GasPriceSource for DownProvider {
    async fn gas_price(&self) -> BlockchainResult<GasPrice> {
        Err(BlockchainError::Rpc("connection refused".into()))
    }
}

/// Emits the given block numbers, then stays subscribed without new blocks.
pub struct ScriptedBlocks(pub Vec<u64>);

impl BlockSource for ScriptedBlocks {
    async fn subscribe(&self) -> BlockchainResult<BlockStream> {
        let blocks: Vec<_> = self
            .0
            .iter()
            .map(|&number| BlockNotification { number })
            .collect();
        Ok(stream::iter(blocks).chain(stream::pending()).boxed())
    }
}

/// Records every deploy request and answers with a fixed exit code.
#[derive(Default)]
pub struct RecordingDeployer {
    pub calls: Mutex<Vec<NetworkMode>>,
    pub exit_code: i32,
}

impl RecordingDeployer {
    pub fn exiting_with(exit_code: i32) -> Arc<Self> {
        Arc::new(Self {
            exit_code,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<NetworkMode> {
        self.calls.lock().unwrap().clone()
    }
}

impl Deployer for RecordingDeployer {
    fn deploy(&self, network: NetworkMode) -> Result<DeployOutcome, DeployError> {
        self.calls.lock().unwrap().push(network);
        Ok(DeployOutcome::from_code(self.exit_code))
    }
}

pub fn fast_retries() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay_ms: 1,
        max_delay_ms: 5,
    }
}

/// Run the binary's flow for `args` against fake components and return the
/// process exit code. `connects` counts how often the provider was opened.
pub async fn run_cli<P, S>(
    args: &[&str],
    components: Components<P, S>,
    connects: &AtomicUsize,
) -> u8
where
    P: GasPriceSource,
    S: BlockSource,
{
    let cli = Cli::try_parse_from(std::iter::once("deploy-under-gas").chain(args.iter().copied()))
        .unwrap();
    let mut startup = match prepare(&cli, io::empty(), io::sink()) {
        Ok(startup) => startup,
        Err(e) => return e.exit_code(),
    };
    startup.watcher.retries = fast_retries();

    let connect = |_config: WatcherConfig| async move {
        connects.fetch_add(1, Ordering::SeqCst);
        Ok::<_, RunError>(components)
    };

    match launch(startup, connect, &mut StatusLine::sink()).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => e.exit_code(),
    }
}

/// Start a JSON-RPC backend that answers every request with the next head
/// block number from `heads`; the last one repeats forever.
pub async fn start_mock_rpc(heads: Vec<u64>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let heads = Arc::new(Mutex::new(VecDeque::from(heads)));

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let heads = heads.clone();
            tokio::spawn(async move {
                let Some(body) = read_request_body(&mut socket).await else {
                    return;
                };
                let head = {
                    let mut heads = heads.lock().unwrap();
                    if heads.len() > 1 {
                        heads.pop_front().unwrap()
                    } else {
                        *heads.front().unwrap()
                    }
                };
                let payload = format!(
                    r#"{{"jsonrpc":"2.0","id":{},"result":"0x{:x}"}}"#,
                    request_id(&body),
                    head
                );
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    payload.len(),
                    payload
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

async fn read_request_body(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        let Some(end) = text.find("\r\n\r\n") else {
            continue;
        };
        let length = text[..end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.trim().eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        let start = end + 4;
        if text.len() >= start + length {
            return Some(text[start..start + length].to_string());
        }
    }
}

/// Raw JSON value of the request's `id`, echoed back in the response.
fn request_id(body: &str) -> String {
    body.split_once("\"id\":")
        .and_then(|(_, rest)| rest.split(|c: char| c == ',' || c == '}').next())
        .map(|id| id.trim().to_string())
        .unwrap_or_else(|| "0".to_string())
}
