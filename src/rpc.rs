use alloy::primitives::{Address, B256, U64, U256};
use alloy::providers::Provider;
use alloy_json_rpc::{RpcError, RpcRecv, RpcSend};
use alloy::rpc::types::Transaction;
use displaydoc::Display;
use std::borrow::Cow;
use thiserror::Error;

use crate::resilient_provider::ResilientProvider;

/// Represents errors raised by raw JSON-RPC calls.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Error response from RPC service: {0}
    ErrorResponse(String),
    /// Failed to serialize the RPC request: {0}
    Serialization(String),
    /// Failed to deserialize the RPC response: {0}
    Deserialization(String),
    /// Failed to send the RPC request: {0}
    Transport(String),
    /// Unexpected value in RPC response: {0}
    UnexpectedValue(String),
}

impl ResilientProvider {
    /// Makes a JSON-RPC call that the provider trait does not cover.
    pub async fn rpc_call<S: RpcSend, R: RpcRecv>(
        &self,
        method: impl Into<Cow<'static, str>>,
        params: S,
    ) -> Result<R, Error> {
        let method = method.into();
        log::debug!("RPC Call - Method: {method}, Params: {params:?}");
        self.inner()
            .client()
            .request(method, params)
            .await
            .inspect(|res| log::debug!("RPC Response: {res:?}"))
            .map_err(|e| match e {
                RpcError::ErrorResp(err) => Error::ErrorResponse(err.to_string()),
                RpcError::SerError(err) => Error::Serialization(err.to_string()),
                RpcError::DeserError { err, text } => {
                    log::debug!("Deserialization error: {err}, response text: {text}");
                    Error::Deserialization(err.to_string())
                }
                other => Error::Transport(other.to_string()),
            })
    }

    /// Network id reported by `net_version`.
    ///
    /// Nodes return it as a decimal string.
    pub async fn network_id(&self) -> Result<u64, Error> {
        let version = self.rpc_call::<(), String>("net_version", ()).await?;
        version
            .trim()
            .parse()
            .map_err(|_| Error::UnexpectedValue(format!("net_version returned `{version}`")))
    }

    /// Number of transactions in the block with the given hash.
    /// Returns `None` for an unknown block.
    pub async fn block_transaction_count_by_hash(&self, hash: B256) -> Result<Option<u64>, Error> {
        let count = self
            .rpc_call::<(B256,), Option<U64>>("eth_getBlockTransactionCountByHash", (hash,))
            .await?;
        Ok(count.map(|c| c.to::<u64>()))
    }

    /// Transaction at position `index` in the block with the given hash.
    pub async fn transaction_by_block_hash_and_index(
        &self,
        hash: B256,
        index: u64,
    ) -> Result<Option<Transaction>, Error> {
        self.rpc_call::<(B256, U64), Option<Transaction>>(
            "eth_getTransactionByBlockHashAndIndex",
            (hash, U64::from(index)),
        )
        .await
    }

    /// Balance including transactions still in the mempool.
    pub async fn pending_balance(&self, address: Address) -> Result<U256, Error> {
        self.rpc_call::<(Address, &'static str), U256>("eth_getBalance", (address, "pending"))
            .await
    }
}
