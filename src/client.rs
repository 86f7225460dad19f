use alloy::eips::{BlockId, BlockNumberOrTag};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256, Bytes, I256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Block, Header, Transaction, TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use alloy_sol_types::SolCall;
use anyhow::anyhow;
use bigdecimal::BigDecimal;
use bon::bon;
use serde::Serialize;

use crate::account::Account;
use crate::config::ws_url_from_http;
use crate::contracts::{Counter, IERC20, Store};
use crate::events::EventsClient;
use crate::receipt::{ReceiptPolling, wait_for_receipt};
use crate::resilient_provider::{ResilientProvider, ResilientProviderConfig};
use crate::utils::{to_token_units, wei_to_eth};

/// ERC-20 metadata together with one holder's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Raw balance in the token's smallest unit.
    pub balance: U256,
}

impl TokenInfo {
    /// Balance scaled by the token's decimals.
    pub fn balance_in_units(&self) -> BigDecimal {
        to_token_units(self.balance, self.decimals)
    }
}

/// A transaction looked up by hash.
#[derive(Debug, Clone)]
pub struct TransactionLookup {
    pub transaction: Transaction,
    /// True while the transaction has not been included in a block.
    pub is_pending: bool,
}

/// Read-only client over an HTTP JSON-RPC endpoint.
///
/// Every query goes through a [`ResilientProvider`]. Signing goes through an
/// [`Account`] obtained from [`StudyClient::account`].
#[derive(Clone)]
pub struct StudyClient {
    pub(crate) provider: ResilientProvider,
    pub(crate) rpc_url: Url,
}

#[bon]
impl StudyClient {
    /// Creates a new builder for `StudyClient` with the given RPC URL.
    #[builder(finish_fn = build)]
    pub fn builder(
        rpc_url: Url,
        #[builder(default)] retry_config: ResilientProviderConfig,
    ) -> Self {
        let provider = ProviderBuilder::new()
            .connect_http(rpc_url.clone())
            .erased();

        Self {
            provider: ResilientProvider::new(provider, retry_config),
            rpc_url,
        }
    }

    /// Creates a new client with default retry settings.
    pub fn new(rpc_url: Url) -> Self {
        Self::builder().rpc_url(rpc_url).build()
    }

    /// Wraps an existing provider, for instance a mocked one.
    pub fn from_provider(provider: ResilientProvider, rpc_url: Url) -> Self {
        Self { provider, rpc_url }
    }

    /// The provider all queries go through.
    pub fn provider(&self) -> &ResilientProvider {
        &self.provider
    }

    /// The HTTP endpoint this client talks to.
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    pub async fn chain_id(&self) -> anyhow::Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| anyhow!("Failed to get chain ID: {e}"))
    }

    pub async fn network_id(&self) -> anyhow::Result<u64> {
        Ok(self.provider.network_id().await?)
    }

    /// Number of the latest block.
    pub async fn block_number(&self) -> anyhow::Result<u64> {
        self.provider.get_block_number().await
    }

    /// Balance in wei at the latest block.
    pub async fn balance(&self, address: Address) -> anyhow::Result<U256> {
        self.provider.get_balance(address, BlockId::latest()).await
    }

    /// Balance in wei at a past block.
    pub async fn balance_at(&self, address: Address, block: u64) -> anyhow::Result<U256> {
        self.provider
            .get_balance(address, BlockId::number(block))
            .await
    }

    /// Balance in wei including pending transactions.
    pub async fn pending_balance(&self, address: Address) -> anyhow::Result<U256> {
        Ok(self.provider.pending_balance(address).await?)
    }

    /// Latest balance converted to ETH.
    pub async fn balance_eth(&self, address: Address) -> anyhow::Result<BigDecimal> {
        Ok(wei_to_eth(self.balance(address).await?))
    }

    /// Header of the given block, or of the latest one when `number` is `None`.
    pub async fn header(&self, number: Option<u64>) -> anyhow::Result<Header> {
        let tag = number.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number);
        let block = self
            .provider
            .get_block_by_number(tag, false)
            .await?
            .ok_or_else(|| anyhow!("Block {tag} not found"))?;
        Ok(block.header)
    }

    /// Block with full transaction bodies.
    pub async fn block_by_number(&self, number: u64) -> anyhow::Result<Block> {
        self.provider
            .get_block_by_number(BlockNumberOrTag::Number(number), true)
            .await?
            .ok_or_else(|| anyhow!("Block {number} not found"))
    }

    /// Block with full transaction bodies.
    pub async fn block_by_hash(&self, hash: B256) -> anyhow::Result<Block> {
        self.provider
            .get_block_by_hash(hash, true)
            .await?
            .ok_or_else(|| anyhow!("Block {hash} not found"))
    }

    pub async fn block_transaction_count(&self, block_hash: B256) -> anyhow::Result<u64> {
        self.provider
            .block_transaction_count_by_hash(block_hash)
            .await?
            .ok_or_else(|| anyhow!("Block {block_hash} not found"))
    }

    pub async fn transaction_in_block(
        &self,
        block_hash: B256,
        index: u64,
    ) -> anyhow::Result<Transaction> {
        self.provider
            .transaction_by_block_hash_and_index(block_hash, index)
            .await?
            .ok_or_else(|| anyhow!("No transaction at index {index} of block {block_hash}"))
    }

    pub async fn transaction_by_hash(&self, hash: B256) -> anyhow::Result<TransactionLookup> {
        let transaction = self
            .provider
            .get_transaction_by_hash(hash)
            .await?
            .ok_or_else(|| anyhow!("Transaction {hash} not found"))?;
        let is_pending = transaction.block_hash.is_none();
        Ok(TransactionLookup {
            transaction,
            is_pending,
        })
    }

    pub async fn receipt(&self, hash: B256) -> anyhow::Result<TransactionReceipt> {
        self.provider
            .get_transaction_receipt(hash)
            .await?
            .ok_or_else(|| anyhow!("Receipt for {hash} not found"))
    }

    /// Receipts of every transaction in a block.
    pub async fn block_receipts(&self, number: u64) -> anyhow::Result<Vec<TransactionReceipt>> {
        self.provider
            .get_block_receipts(BlockId::number(number))
            .await?
            .ok_or_else(|| anyhow!("Block {number} not found"))
    }

    /// Suggested gas price in wei.
    pub async fn gas_price(&self) -> anyhow::Result<u128> {
        self.provider.get_gas_price().await
    }

    /// Runs `eth_call` with raw input against `to`.
    pub async fn call(&self, to: Address, input: Bytes) -> anyhow::Result<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(input);
        self.provider.call(&request).await
    }

    /// Runs a typed read-only call and decodes its return value.
    pub async fn read<C: SolCall>(&self, to: Address, call: C) -> anyhow::Result<C::Return> {
        let output = self.call(to, call.abi_encode().into()).await?;
        C::abi_decode_returns(&output)
            .map_err(|e| anyhow!("Failed to decode {} output: {e}", C::SIGNATURE))
    }

    /// Reads ERC-20 metadata and the balance of `holder`.
    pub async fn token_info(&self, token: Address, holder: Address) -> anyhow::Result<TokenInfo> {
        let name = self.read(token, IERC20::nameCall {}).await?;
        let symbol = self.read(token, IERC20::symbolCall {}).await?;
        let decimals = self.read(token, IERC20::decimalsCall {}).await?;
        let balance = self
            .read(token, IERC20::balanceOfCall { account: holder })
            .await?;
        Ok(TokenInfo {
            name,
            symbol,
            decimals,
            balance,
        })
    }

    pub async fn store_version(&self, store: Address) -> anyhow::Result<String> {
        self.read(store, Store::versionCall {}).await
    }

    pub async fn store_item(&self, store: Address, key: B256) -> anyhow::Result<B256> {
        self.read(store, Store::itemsCall { key }).await
    }

    pub async fn counter_value(&self, counter: Address) -> anyhow::Result<I256> {
        self.read(counter, Counter::getCountCall {}).await
    }

    /// Waits for the receipt of any transaction.
    pub async fn wait_for_transaction(
        &self,
        tx_hash: B256,
        polling: &ReceiptPolling,
    ) -> anyhow::Result<TransactionReceipt> {
        wait_for_receipt(&self.provider, tx_hash, polling).await
    }

    /// Creates a signing account on the connected chain.
    pub async fn account(&self, signer: PrivateKeySigner) -> anyhow::Result<Account> {
        let chain_id = self.chain_id().await?;
        log::debug!("Using chain id {chain_id} for {}", signer.address());
        Ok(Account::new(signer, self.provider.clone(), chain_id))
    }

    /// Creates a new WebSocket client for event subscriptions using the default RPC URL.
    pub async fn events_client(&self) -> anyhow::Result<EventsClient> {
        let ws_url = ws_url_from_http(&self.rpc_url)?;
        EventsClient::new(ws_url).await
    }

    /// Creates a new WebSocket client for event subscriptions with a custom WebSocket URL.
    pub async fn events_client_with_url(&self, ws_url: Url) -> anyhow::Result<EventsClient> {
        EventsClient::new(ws_url).await
    }
}
