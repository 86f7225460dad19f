//! Helpers shared by the integration tests.

use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::mock::Asserter;
use eth_client_study::config::{self, RPC_HTTP_URL};
use eth_client_study::resilient_provider::{ResilientProvider, ResilientProviderConfig};
use eth_client_study::StudyClient;
use serde_json::{Value, json};
use url::Url;

/// URL of a local development node.
pub const LOCAL_RPC_URL: &str = "http://localhost:8545";
pub const LOCAL_WS_URL: &str = "ws://localhost:8545";

/// Placeholder endpoint for clients backed by a mocked transport.
pub const MOCK_RPC_URL: &str = "http://mock.invalid";

/// Private key of the first development account of anvil and hardhat.
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Initializes the logger once per test binary.
pub fn init_logger(should_init: bool) {
    if should_init {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .is_test(true)
            .try_init();
    }
}

/// Retry settings that keep mocked tests fast.
pub fn fast_retry_config() -> ResilientProviderConfig {
    ResilientProviderConfig {
        max_retries: 3,
        retry_delay_ms: 1,
        backend_health_timeout_secs: 5,
    }
}

/// A provider answering from the queue of `asserter`.
pub fn mocked_provider(asserter: &Asserter, config: ResilientProviderConfig) -> ResilientProvider {
    let provider = ProviderBuilder::new()
        .connect_mocked_client(asserter.clone())
        .erased();
    ResilientProvider::new(provider, config)
}

/// A client answering from a fresh mocked transport.
pub fn mocked_client() -> (Asserter, StudyClient) {
    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());
    let url = Url::parse(MOCK_RPC_URL).unwrap_or_else(|e| panic!("bad mock url: {e}"));
    (asserter, StudyClient::from_provider(provider, url))
}

/// Client for the node named by `RPC_HTTP_URL`, for tests run against a live network.
pub fn live_client() -> anyhow::Result<StudyClient> {
    config::load_dotenv()?;
    let url = Url::parse(&config::env_var_or(RPC_HTTP_URL, LOCAL_RPC_URL))?;
    Ok(StudyClient::new(url))
}

/// JSON of a mined legacy transaction receipt.
pub fn receipt_json(tx_hash: B256, from: Address, to: Address, success: bool) -> Value {
    json!({
        "type": "0x0",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": "0x568b40",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x77359400",
        "from": from,
        "to": to,
        "contractAddress": null
    })
}

/// JSON of an EIP-155 legacy transfer on Sepolia.
/// `block_number` of `None` describes a transaction still in the mempool.
pub fn transaction_json(tx_hash: B256, from: Address, to: Address, block_number: Option<u64>) -> Value {
    let (block_hash, number, index) = match block_number {
        Some(n) => (
            json!(B256::repeat_byte(0xbb)),
            json!(format!("{n:#x}")),
            json!("0x0"),
        ),
        None => (Value::Null, Value::Null, Value::Null),
    };
    json!({
        "type": "0x0",
        "chainId": "0xaa36a7",
        "nonce": "0x7",
        "gasPrice": "0x77359400",
        "gas": "0x5208",
        "to": to,
        "value": "0x3e8",
        "input": "0x",
        "v": "0x1546d71",
        "r": "0x4f5b4a1c0ab8b0b2b6c0d3f1e6bb9b0bb3c1f2f7f1d6f1a7d3b5a1f8c4e2d1a0",
        "s": "0x2a6d3f1b7c9e4d2f8a1b3c5d7e9f0a2b4c6d8e0f1a3b5c7d9e1f3a5b7c9d1e3f",
        "hash": tx_hash,
        "blockHash": block_hash,
        "blockNumber": number,
        "transactionIndex": index,
        "from": from
    })
}
