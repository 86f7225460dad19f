use std::time::Duration;

use alloy::network::Ethereum;
use alloy::eips::{BlockId, BlockNumberOrTag};
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider};
use alloy::rpc::types::{Block, Filter, Log, Transaction, TransactionReceipt, TransactionRequest};
use anyhow::{Result, anyhow};

/// Retry behavior of [`ResilientProvider`].
#[derive(Clone, Debug)]
pub struct ResilientProviderConfig {
    /// Maximum number of retry attempts for "error sending request" errors.
    pub max_retries: u32,
    /// Delay between "no backend is currently healthy" retries in milliseconds.
    pub retry_delay_ms: u64,
    /// Timeout in seconds for "no backend is currently healthy" errors.
    pub backend_health_timeout_secs: u64,
}

impl Default for ResilientProviderConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 100,
            backend_health_timeout_secs: 30,
        }
    }
}

/// A wrapper around [`DynProvider`] that retries transient transport failures.
///
/// Public endpoints sit behind load balancers that drop connections while
/// switching backends. Those failures are retried; every other error is
/// returned to the caller unchanged.
#[derive(Clone)]
pub struct ResilientProvider {
    provider: DynProvider,
    config: ResilientProviderConfig,
}

impl ResilientProvider {
    /// Creates a new ResilientProvider with the given provider and configuration.
    pub fn new(provider: DynProvider, config: ResilientProviderConfig) -> Self {
        Self { provider, config }
    }

    /// Creates a new ResilientProvider with default configuration.
    pub fn new_with_default_config(provider: DynProvider) -> Self {
        Self::new(provider, ResilientProviderConfig::default())
    }

    /// Gets the underlying provider.
    pub fn inner(&self) -> &DynProvider {
        &self.provider
    }

    /// Gets the retry configuration.
    pub fn config(&self) -> &ResilientProviderConfig {
        &self.config
    }

    async fn retry<T, F, Fut, E>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempts = 0;
        let start_time = std::time::Instant::now();

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.to_string().contains("error sending request") => {
                    attempts += 1;
                    if attempts > self.config.max_retries {
                        return Err(anyhow!(
                            "{operation_name} failed after {} attempts with 'error sending request': {e}",
                            self.config.max_retries,
                        ));
                    }
                    log::debug!(
                        "{operation_name} failed with 'error sending request' (attempt {attempts}/{}). Retrying...",
                        self.config.max_retries
                    );
                }
                Err(e)
                    if e.to_string()
                        .contains("no backend is currently healthy to serve traffic") =>
                {
                    let elapsed = start_time.elapsed();
                    let timeout = Duration::from_secs(self.config.backend_health_timeout_secs);
                    if elapsed >= timeout {
                        return Err(anyhow!(
                            "{operation_name} failed after {} seconds with 'no backend is currently healthy to serve traffic': {e}",
                            self.config.backend_health_timeout_secs,
                        ));
                    }
                    log::debug!(
                        "{operation_name} failed with 'no backend is currently healthy to serve traffic' (elapsed: {:.1}s/{:.1}s). Retrying...",
                        elapsed.as_secs_f64(),
                        timeout.as_secs_f64()
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
                Err(e) => return Err(anyhow!("{operation_name} failed: {e}")),
            }
        }
    }

    /// Gets the chain ID with retry logic.
    pub async fn get_chain_id(&self) -> Result<u64> {
        self.retry("get_chain_id", || self.provider.get_chain_id())
            .await
    }

    /// Gets the number of the most recent block.
    pub async fn get_block_number(&self) -> Result<u64> {
        self.retry("get_block_number", || self.provider.get_block_number())
            .await
    }

    /// Gets the next nonce for an address, counting pending transactions.
    pub async fn get_pending_transaction_count(&self, address: Address) -> Result<u64> {
        self.retry("get_transaction_count", || async {
            self.provider.get_transaction_count(address).pending().await
        })
        .await
    }

    /// Gets the gas price suggested by the node, in wei.
    pub async fn get_gas_price(&self) -> Result<u128> {
        self.retry("get_gas_price", || self.provider.get_gas_price())
            .await
    }

    /// Estimates the gas a transaction would use.
    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64> {
        self.retry("estimate_gas", || async {
            self.provider.estimate_gas(tx.clone()).await
        })
        .await
    }

    /// Executes a read-only call against the latest state.
    pub async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        self.retry("call", || async { self.provider.call(tx.clone()).await })
            .await
    }

    /// Gets the balance of an address at the given block.
    pub async fn get_balance(&self, address: Address, block: BlockId) -> Result<U256> {
        self.retry("get_balance", || async {
            self.provider.get_balance(address).block_id(block).await
        })
        .await
    }

    /// Gets a block by number, with hashes only or with full transactions.
    pub async fn get_block_by_number(
        &self,
        number: BlockNumberOrTag,
        full: bool,
    ) -> Result<Option<Block>> {
        self.retry("get_block_by_number", || async {
            let request = self.provider.get_block_by_number(number);
            if full {
                request.full().await
            } else {
                request.await
            }
        })
        .await
    }

    /// Gets a block by hash, with hashes only or with full transactions.
    pub async fn get_block_by_hash(&self, hash: B256, full: bool) -> Result<Option<Block>> {
        self.retry("get_block_by_hash", || async {
            let request = self.provider.get_block_by_hash(hash);
            if full {
                request.full().await
            } else {
                request.await
            }
        })
        .await
    }

    /// Gets all receipts of a block.
    pub async fn get_block_receipts(
        &self,
        block: BlockId,
    ) -> Result<Option<Vec<TransactionReceipt>>> {
        self.retry("get_block_receipts", || async {
            self.provider.get_block_receipts(block).await
        })
        .await
    }

    /// Gets a transaction by hash with retry logic.
    pub async fn get_transaction_by_hash(&self, hash: B256) -> Result<Option<Transaction>> {
        self.retry("get_transaction_by_hash", || {
            self.provider.get_transaction_by_hash(hash)
        })
        .await
    }

    /// Gets a transaction receipt with retry logic.
    pub async fn get_transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>> {
        self.retry("get_transaction_receipt", || {
            self.provider.get_transaction_receipt(hash)
        })
        .await
    }

    /// Broadcasts a signed, 2718-encoded transaction.
    pub async fn send_raw_transaction(&self, data: &[u8]) -> Result<PendingTransactionBuilder<Ethereum>> {
        self.retry("send_raw_transaction", || {
            self.provider.send_raw_transaction(data)
        })
        .await
    }

    /// Gets the logs matching a filter.
    pub async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        self.retry("get_logs", || self.provider.get_logs(filter))
            .await
    }
}

impl From<DynProvider> for ResilientProvider {
    fn from(provider: DynProvider) -> Self {
        Self::new_with_default_config(provider)
    }
}

impl From<ResilientProvider> for DynProvider {
    fn from(resilient_provider: ResilientProvider) -> Self {
        resilient_provider.provider
    }
}
