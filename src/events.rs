use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder, WsConnect};
use alloy::rpc::types::{Filter, Header, Log};
use alloy::transports::http::reqwest::Url;
use alloy_sol_types::SolEvent;
use anyhow::{Result, anyhow};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::convert::TryFrom;
use std::fmt;
use std::pin::Pin;

use crate::calldata::bytes32_to_string;
use crate::contracts::Store;

/// Boxed stream returned by the subscription helpers.
pub type EventStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// A decoded `ItemSet(bytes32 key, bytes32 value)` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSetEvent {
    pub key: B256,
    pub value: B256,
    /// The block number where the event occurred
    pub block_number: u64,
    /// The transaction hash that triggered the event
    pub transaction_hash: B256,
}

impl ItemSetEvent {
    /// Key read back as text.
    pub fn key_text(&self) -> String {
        bytes32_to_string(&self.key)
    }

    /// Value read back as text.
    pub fn value_text(&self) -> String {
        bytes32_to_string(&self.value)
    }
}

impl fmt::Display for ItemSetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ItemSet key={} value={} (block {}, tx {})",
            self.key_text(),
            self.value_text(),
            self.block_number,
            self.transaction_hash
        )
    }
}

impl TryFrom<Log> for ItemSetEvent {
    type Error = anyhow::Error;

    /// Fails on logs still pending (no block or transaction yet) and on
    /// logs that are not a well-formed `ItemSet`.
    fn try_from(log: Log) -> Result<Self> {
        let block_number = log
            .block_number
            .ok_or_else(|| anyhow!("Missing block number"))?;
        let transaction_hash = log
            .transaction_hash
            .ok_or_else(|| anyhow!("Missing transaction hash"))?;
        let decoded = Store::ItemSet::decode_log(&log.inner)
            .map_err(|e| anyhow!("Failed to decode ItemSet log: {e}"))?;
        Ok(Self {
            key: decoded.data.key,
            value: decoded.data.value,
            block_number,
            transaction_hash,
        })
    }
}

/// Filter matching `ItemSet` logs emitted by `contract`.
pub fn item_set_filter(contract: Address) -> Filter {
    Filter::new()
        .address(contract)
        .event_signature(Store::ItemSet::SIGNATURE_HASH)
}

/// Client for subscribing to block headers and contract logs over WebSocket.
pub struct EventsClient {
    provider: DynProvider,
}

impl EventsClient {
    /// Creates a new `EventsClient` by connecting to the given websocket `Url`.
    pub async fn new(url: Url) -> Result<Self> {
        log::debug!("Connecting to websocket provider: {url}");

        let provider = ProviderBuilder::new()
            .connect_ws(WsConnect::new(url.clone()))
            .await?
            .erased();

        log::info!("Connected to websocket provider: {url}");
        Ok(Self { provider })
    }

    /// Wraps an already connected provider.
    pub fn from_provider(provider: DynProvider) -> Self {
        Self { provider }
    }

    /// Streams the header of every new block.
    pub async fn new_heads(&self) -> Result<EventStream<'_, Header>> {
        let subscription = self.provider.subscribe_blocks().await?;
        Ok(Box::pin(subscription.into_stream()))
    }

    /// Streams `ItemSet` events of `contract` as they are emitted.
    pub async fn item_set_stream(
        &self,
        contract: Address,
    ) -> Result<EventStream<'_, Result<ItemSetEvent>>> {
        let filter = item_set_filter(contract);
        let subscription = self.provider.subscribe_logs(&filter).await?;
        Ok(Box::pin(subscription.into_stream().map(ItemSetEvent::try_from)))
    }

    /// Fetches past `ItemSet` events of `contract` between two blocks, inclusive.
    /// A `to` of `0` means the latest block.
    pub async fn item_set_history(
        &self,
        contract: Address,
        from: u64,
        to: u64,
    ) -> Result<Vec<ItemSetEvent>> {
        let filter = history_filter(contract, from, to);
        let logs = self.provider.get_logs(&filter).await?;
        log::debug!("Fetched {} ItemSet logs", logs.len());
        logs.into_iter().map(ItemSetEvent::try_from).collect()
    }
}

fn history_filter(contract: Address, from: u64, to: u64) -> Filter {
    let to_block = match to {
        0 => BlockNumberOrTag::Latest,
        n => BlockNumberOrTag::Number(n),
    };
    item_set_filter(contract)
        .from_block(BlockNumberOrTag::Number(from))
        .to_block(to_block)
}
