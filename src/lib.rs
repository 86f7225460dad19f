//! # Ethereum client study
//!
//! Small, self-contained programs that talk to an Ethereum node over JSON-RPC and WebSocket:
//! generating keys, reading balances, blocks, transactions and receipts, following new heads
//! and contract events, and sending signed transactions (native transfers, ERC-20 transfers
//! and contract calls).
//!
//! The programs themselves live in the `study` crate of this workspace, one binary per program.
//! This crate holds the pieces they all repeat:
//! - [`StudyClient`] for read-only queries over HTTP;
//! - [`Account`](crate::account::Account) for building, signing and sending legacy transactions;
//! - [`EventsClient`](crate::events::EventsClient) for subscriptions over WebSocket;
//! - [`calldata`] for building ABI call data by hand, next to the `sol!` bindings in [`contracts`].
//!
//! Endpoints and keys are read from the environment, with a `.env` file in the working
//! directory loaded first (see [`config`]).

/// Re-export commonly used types from `alloy`.
pub use alloy::primitives::{Address, B256, U256, keccak256};
pub use alloy::signers::local::PrivateKeySigner;
pub use alloy::transports::http::reqwest::Url;

pub use account::Account;
pub use client::{StudyClient, TokenInfo};
pub use config::StudyConfig;
pub use events::{EventsClient, ItemSetEvent};
pub use receipt::{ReceiptOutcome, ReceiptPolling};
pub use resilient_provider::ResilientProvider;
pub use wallet::Keypair;

/// Module for signing accounts.
/// Builds, signs and submits legacy transactions on behalf of a private key.
pub mod account;

/// Module for hand-made ABI call data.
/// Selectors, padding and the `bytes32` helpers used by the Store contract.
pub mod calldata;

/// Module for the HTTP client.
/// Exposes the read-side queries every program starts from.
pub mod client;

/// Module for environment configuration.
pub mod config;

/// Module for contract bindings and well-known addresses.
pub mod contracts;

/// Module for WebSocket subscriptions and contract event decoding.
pub mod events;

/// Module for waiting on transaction receipts.
pub mod receipt;

/// Module wrapping the provider with retries for transient transport errors.
pub mod resilient_provider;

/// Module for raw JSON-RPC calls not covered by the provider API.
pub mod rpc;

/// Module with utility functions.
/// Unit conversions and formatting helpers.
pub mod utils;

/// Module for key generation and address derivation.
pub mod wallet;
