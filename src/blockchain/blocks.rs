//! New-block notification sources.
//!
//! - `WsBlockSource`: `eth_subscribe("newHeads")` over a websocket.
//! - `PollingBlockSource`: `eth_blockNumber` polling over HTTP, emitting
//!   whenever the head advances.

use std::time::Duration;

use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use futures_util::stream::{self, StreamExt};
use tokio::time::sleep;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::source::{BlockSource, BlockStream};
use crate::blockchain::types::{BlockNotification, BlockchainError, BlockchainResult};

/// Push-based block source backed by a websocket subscription.
#[derive(Debug, Clone)]
pub struct WsBlockSource {
    url: String,
}

impl WsBlockSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl BlockSource for WsBlockSource {
    async fn subscribe(&self) -> BlockchainResult<BlockStream> {
        let provider = ProviderBuilder::new()
            .connect_ws(WsConnect::new(self.url.clone()))
            .await
            .map_err(|e| BlockchainError::Subscription(format!("connect {}: {}", self.url, e)))?;

        let subscription = provider
            .subscribe_blocks()
            .await
            .map_err(|e| BlockchainError::Subscription(e.to_string()))?;

        tracing::debug!(url = %self.url, "Subscribed to newHeads");

        // The stream owns the provider so the websocket stays open while it is polled.
        let stream = subscription.into_stream().map(move |header| {
            let _connection = &provider;
            BlockNotification {
                number: header.number,
            }
        });
        Ok(stream.boxed())
    }
}

/// Block source that polls the head block number over HTTP.
#[derive(Debug, Clone)]
pub struct PollingBlockSource {
    client: BlockchainClient,
    interval: Duration,
}

impl PollingBlockSource {
    pub fn new(client: BlockchainClient, interval: Duration) -> Self {
        Self { client, interval }
    }
}

impl BlockSource for PollingBlockSource {
    async fn subscribe(&self) -> BlockchainResult<BlockStream> {
        // Fail the subscription up front if the endpoint is unreachable.
        let head = self.client.get_block_number().await?;
        let interval = self.interval;

        let first = stream::once(async move { BlockNotification { number: head } });
        let rest = stream::unfold(
            (self.client.clone(), head),
            move |(client, last)| async move {
                loop {
                    sleep(interval).await;
                    match client.get_block_number().await {
                        Ok(number) if number > last => {
                            return Some((advanced(last, number), (client, number)));
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "Block polling failed, ending subscription");
                            return None;
                        }
                    }
                }
            },
        )
        .flat_map(stream::iter);
        Ok(first.chain(rest).boxed())
    }
}

/// One notification per block in `(last, head]`, so a head that jumps
/// several blocks between polls still reports each of them.
fn advanced(last: u64, head: u64) -> Vec<BlockNotification> {
    (last + 1..=head)
        .map(|number| BlockNotification { number })
        .collect()
}

/// Block source selected at startup from configuration.
#[derive(Debug, Clone)]
pub enum AnyBlockSource {
    Ws(WsBlockSource),
    Polling(PollingBlockSource),
}

impl BlockSource for AnyBlockSource {
    async fn subscribe(&self) -> BlockchainResult<BlockStream> {
        match self {
            Self::Ws(source) => source.subscribe().await,
            Self::Polling(source) => source.subscribe().await,
        }
    }
}
