//! Setup shared by the study binaries in `src/bin`.

use alloy::consensus::Transaction as _;
use alloy::network::{ReceiptResponse, TransactionResponse};
use alloy::primitives::Bytes;
use alloy::rpc::types::{Transaction, TransactionReceipt};
use anyhow::Context;
use eth_client_study::config::{self, StudyConfig};
use eth_client_study::{Account, Keypair, StudyClient};
use futures::{Stream, StreamExt};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

/// Initializes `env_logger` with `info` as the default level.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Loads `.env` and connects a client to `RPC_HTTP_URL`.
pub fn connect() -> anyhow::Result<(StudyConfig, StudyClient)> {
    let config = StudyConfig::from_env()?;
    log::debug!("Using RPC endpoint {}", config.rpc_http_url);
    let client = StudyClient::new(config.rpc_http_url.clone());
    Ok((config, client))
}

/// Connects and loads the signing account from `PRIVATE_KEY1`.
pub async fn connect_with_account() -> anyhow::Result<(StudyConfig, StudyClient, Account)> {
    let (config, client) = connect()?;
    let keypair = Keypair::from_hex(config.private_key()?)?;
    let account = client.account(keypair.into_signer()).await?;
    log::info!("Sending from {}", account.address());
    Ok((config, client, account))
}

/// Reads hex-encoded creation bytecode from the file named by `env_key`.
pub fn read_bytecode(env_key: &str) -> anyhow::Result<Bytes> {
    let path = config::env_var(env_key)?;
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read bytecode from {path}"))?;
    Bytes::from_str(text.trim()).with_context(|| format!("{path} does not contain hex bytecode"))
}

/// Logs the fields of a transaction the way the query programs print them.
pub fn log_transaction(tx: &Transaction) {
    log::info!("Transaction hash: {}", tx.tx_hash());
    log::info!("Value (wei): {}", tx.value());
    log::info!("Gas limit: {}", tx.gas_limit());
    log::info!(
        "Gas price: {}",
        alloy::consensus::Transaction::gas_price(tx)
            .map_or_else(|| "n/a".to_string(), |price| price.to_string())
    );
    log::info!("Nonce: {}", tx.nonce());
    log::info!("Data: {}", tx.input());
    log::info!(
        "To: {}",
        alloy::consensus::Transaction::to(tx)
            .map_or_else(|| "contract creation".to_string(), |to| to.to_string())
    );
    log::info!(
        "Chain id: {}",
        tx.chain_id()
            .map_or_else(|| "none".to_string(), |id| id.to_string())
    );
    log::info!("Sender: {}", TransactionResponse::from(tx));
}

/// Logs status and logs of a receipt.
pub fn log_receipt(receipt: &TransactionReceipt) {
    log::info!("Status: {}", u8::from(receipt.status()));
    log::info!("Logs: {:?}", receipt.inner.logs());
}

/// Drives a subscription that is re-established whenever it fails or ends.
///
/// Every item goes to `on_item`. After the stream ends, or `subscribe`
/// fails, waits `delay` and subscribes again. Runs until `max_attempts`
/// subscriptions have been tried, or forever when it is `None`.
/// Returns the number of attempts made.
pub async fn follow_with_resubscribe<F, Fut, S, T>(
    mut subscribe: F,
    mut on_item: impl FnMut(T),
    delay: Duration,
    max_attempts: Option<usize>,
) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<S>>,
    S: Stream<Item = T> + Unpin,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match subscribe().await {
            Ok(mut stream) => {
                while let Some(item) = stream.next().await {
                    on_item(item);
                }
                log::warn!("Subscription ended, resubscribing...");
            }
            Err(e) => log::warn!("Failed to subscribe: {e}"),
        }
        if max_attempts.is_some_and(|max| attempts >= max) {
            return attempts;
        }
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn resubscribes_after_failure_and_end_of_stream() {
        let mut calls = 0;
        let mut seen = Vec::new();
        let attempts = follow_with_resubscribe(
            || {
                calls += 1;
                let call = calls;
                async move {
                    match call {
                        1 => Err(anyhow::anyhow!("eth_subscribe rejected")),
                        2 => Ok(stream::iter(vec![1, 2])),
                        _ => Ok(stream::iter(vec![3])),
                    }
                }
            },
            |item| seen.push(item),
            Duration::from_millis(1),
            Some(3),
        )
        .await;

        assert_eq!(attempts, 3);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn waits_between_attempts() {
        let started = tokio::time::Instant::now();
        let attempts = follow_with_resubscribe(
            || async { anyhow::Ok(stream::iter(Vec::<u8>::new())) },
            |_| {},
            Duration::from_millis(20),
            Some(3),
        )
        .await;

        assert_eq!(attempts, 3);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
