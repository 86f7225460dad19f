use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256, Bytes, TxKind, U256, keccak256};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Result, anyhow};
use displaydoc::Display;
use thiserror::Error;

use crate::calldata;
use crate::contracts::{TOKEN_TRANSFER_GAS_BUFFER, TRANSFER_GAS_LIMIT};
use crate::receipt::{ReceiptPolling, wait_for_receipt};
use crate::resilient_provider::ResilientProvider;

/// Represents errors raised while preparing or signing a transaction.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Transaction request is missing required fields: {0}
    IncompleteRequest(String),
    /// Failed to sign transaction: {0}
    Signing(String),
}

/// A deployment that has been broadcast.
#[derive(Debug, Clone, Copy)]
pub struct Deployment {
    /// Hash of the creation transaction.
    pub tx_hash: B256,
    /// Address the contract will live at once mined.
    pub address: Address,
}

/// An account able to sign and broadcast legacy transactions.
#[derive(Clone)]
pub struct Account {
    /// The account's signing key.
    pub signer: PrivateKeySigner,
    /// The provider for making RPC calls.
    pub provider: ResilientProvider,
    /// Chain id used for EIP-155 replay protection.
    pub chain_id: u64,
}

impl Account {
    /// Creates an account signing with `signer` for chain `chain_id`.
    pub fn new(signer: PrivateKeySigner, provider: ResilientProvider, chain_id: u64) -> Self {
        Self {
            signer,
            provider,
            chain_id,
        }
    }

    /// Returns the Ethereum address of this account.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Next nonce, counting transactions still pending in the mempool.
    pub async fn pending_nonce(&self) -> Result<u64> {
        self.provider
            .get_pending_transaction_count(self.address())
            .await
    }

    /// Builds a legacy (type 0) request from this account.
    pub fn legacy_request(
        &self,
        to: TxKind,
        value: U256,
        gas_limit: u64,
        gas_price: u128,
        input: Bytes,
        nonce: u64,
    ) -> TransactionRequest {
        let mut request = TransactionRequest::default()
            .with_from(self.address())
            .with_chain_id(self.chain_id)
            .with_nonce(nonce)
            .with_value(value)
            .with_gas_limit(gas_limit)
            .with_gas_price(gas_price)
            .with_input(input);
        request.to = Some(to);
        request
    }

    /// Signs a request and returns the signed envelope.
    ///
    /// The signature covers the keccak-256 hash of the signing payload, which
    /// for a legacy transaction with a chain id is the EIP-155 payload.
    pub fn sign(&self, request: TransactionRequest) -> Result<TxEnvelope, Error> {
        let tx = request
            .build_typed_tx()
            .map_err(|request| Error::IncompleteRequest(format!("{request:?}")))?;
        let payload = tx.encoded_for_signing();
        let signature = self
            .signer
            .sign_hash_sync(&keccak256(&payload))
            .map_err(|e| Error::Signing(e.to_string()))?;
        Ok(TxEnvelope::from(tx.into_signed(signature)))
    }

    /// Signs and broadcasts a request, returning the transaction hash.
    pub async fn send(&self, request: TransactionRequest) -> Result<B256> {
        let envelope = self.sign(request)?;
        let encoded = envelope.encoded_2718();
        log::debug!(
            "Raw transaction (hash: {}): 0x{}",
            envelope.tx_hash(),
            hex::encode(&encoded)
        );

        let pending = self
            .provider
            .send_raw_transaction(&encoded)
            .await
            .map_err(|e| anyhow!("Failed to send transaction: {e}"))?;
        let tx_hash = *pending.tx_hash();
        log::info!("Transaction sent: {tx_hash}");
        Ok(tx_hash)
    }

    /// Sends a request and waits for its receipt.
    pub async fn send_and_wait(
        &self,
        request: TransactionRequest,
        polling: &ReceiptPolling,
    ) -> Result<TransactionReceipt> {
        let tx_hash = self.send(request).await?;
        wait_for_receipt(&self.provider, tx_hash, polling).await
    }

    /// Transfers `value` wei to `to` at the node's suggested gas price.
    pub async fn transfer_eth(&self, to: Address, value: U256) -> Result<B256> {
        let nonce = self.pending_nonce().await?;
        let gas_price = self.provider.get_gas_price().await?;
        let request = self.legacy_request(
            TxKind::Call(to),
            value,
            TRANSFER_GAS_LIMIT,
            gas_price,
            Bytes::new(),
            nonce,
        );
        self.send(request).await
    }

    /// Transfers ERC-20 tokens with hand-built call data.
    ///
    /// Gas is estimated against the token contract and padded by
    /// [`TOKEN_TRANSFER_GAS_BUFFER`]. The chain id comes from `net_version`;
    /// if the node does not answer it, the account's chain id is used.
    pub async fn transfer_erc20_manual(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<B256> {
        let nonce = self.pending_nonce().await?;
        let gas_price = self.provider.get_gas_price().await?;
        let data = Bytes::from(calldata::erc20_transfer(to, amount));
        log::debug!("ERC-20 transfer call data: {data}");

        let estimate_request = TransactionRequest::default()
            .with_from(self.address())
            .with_to(token)
            .with_input(data.clone());
        let gas_limit = self.provider.estimate_gas(&estimate_request).await? + TOKEN_TRANSFER_GAS_BUFFER;
        log::info!("Estimated gas limit (with buffer): {gas_limit}");

        let chain_id = match self.provider.network_id().await {
            Ok(id) => id,
            Err(e) => {
                log::warn!("net_version failed ({e}), using chain id {}", self.chain_id);
                self.chain_id
            }
        };

        let request = self
            .legacy_request(TxKind::Call(token), U256::ZERO, gas_limit, gas_price, data, nonce)
            .with_chain_id(chain_id);
        self.send(request).await
    }

    /// Sends a zero-value call with the given input.
    pub async fn call_contract(&self, to: Address, input: Bytes, gas_limit: u64) -> Result<B256> {
        let nonce = self.pending_nonce().await?;
        let gas_price = self.provider.get_gas_price().await?;
        let request =
            self.legacy_request(TxKind::Call(to), U256::ZERO, gas_limit, gas_price, input, nonce);
        self.send(request).await
    }

    /// Broadcasts a contract creation.
    ///
    /// `bytecode` is the creation code with any constructor arguments already
    /// appended. The address is derived from the sender and nonce.
    pub async fn deploy(&self, bytecode: Bytes, gas_limit: u64) -> Result<Deployment> {
        let nonce = self.pending_nonce().await?;
        let gas_price = self.provider.get_gas_price().await?;
        let request =
            self.legacy_request(TxKind::Create, U256::ZERO, gas_limit, gas_price, bytecode, nonce);
        let tx_hash = self.send(request).await?;
        let address = self.address().create(nonce);
        log::info!("Contract deployment sent: {tx_hash}, address: {address}");
        Ok(Deployment { tx_hash, address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::consensus::Transaction;
    use alloy::consensus::transaction::SignerRecoverable;
    use alloy::providers::{Provider, ProviderBuilder};
    use alloy::transports::mock::Asserter;

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn account() -> Account {
        let provider = ProviderBuilder::new()
            .connect_mocked_client(Asserter::new())
            .erased();
        let signer: PrivateKeySigner = DEV_KEY.parse().unwrap();
        Account::new(signer, provider.into(), 11_155_111)
    }

    #[test]
    fn signs_eip155_legacy_transaction() {
        let account = account();
        let to = Address::repeat_byte(0x11);
        let request = account.legacy_request(
            TxKind::Call(to),
            U256::from(1_000u64),
            TRANSFER_GAS_LIMIT,
            2_000_000_000,
            Bytes::new(),
            7,
        );

        let envelope = account.sign(request).unwrap();
        assert!(envelope.is_legacy());
        assert_eq!(envelope.chain_id(), Some(11_155_111));
        assert_eq!(envelope.nonce(), 7);
        assert_eq!(envelope.gas_limit(), TRANSFER_GAS_LIMIT);
        assert_eq!(envelope.to(), Some(to));
        assert_eq!(envelope.recover_signer().unwrap(), account.address());
        assert_eq!(*envelope.tx_hash(), keccak256(envelope.encoded_2718()));
    }

    #[test]
    fn creation_has_no_recipient() {
        let account = account();
        let request = account.legacy_request(
            TxKind::Create,
            U256::ZERO,
            3_000_000,
            1,
            Bytes::from_static(&[0x60, 0x80]),
            0,
        );
        let envelope = account.sign(request).unwrap();
        assert_eq!(envelope.kind(), TxKind::Create);
        assert_eq!(envelope.input().as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn incomplete_request_is_rejected() {
        let account = account();
        let request = TransactionRequest::default()
            .with_to(Address::ZERO)
            .with_gas_price(1);
        assert!(matches!(
            account.sign(request),
            Err(Error::IncompleteRequest(_))
        ));
    }
}
