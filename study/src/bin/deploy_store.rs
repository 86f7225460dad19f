use alloy::primitives::Bytes;
use alloy_sol_types::SolConstructor;
use eth_client_study::contracts::{DEPLOY_GAS_LIMIT, Store};
use eth_client_study::receipt::{ReceiptOutcome, ReceiptPolling};
use eth_client_study_scripts::{connect_with_account, init_logging, read_bytecode};
use log::info;
use std::time::Duration;

/// File holding the hex creation code of the Store contract.
const BYTECODE_PATH: &str = "STORE_BYTECODE_PATH";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client, account) = connect_with_account().await?;

    let mut code = read_bytecode(BYTECODE_PATH)?.to_vec();
    code.extend(
        Store::constructorCall {
            _version: "1.0".to_string(),
        }
        .abi_encode(),
    );

    let deployment = account.deploy(Bytes::from(code), DEPLOY_GAS_LIMIT).await?;
    info!("Contract address: {}", deployment.address);

    let polling = ReceiptPolling::with_timeout(Duration::from_secs(300));
    let receipt = client
        .wait_for_transaction(deployment.tx_hash, &polling)
        .await?;
    info!(
        "Deployment {} in block {}",
        ReceiptOutcome::from(&receipt),
        receipt.block_number.unwrap_or_default()
    );
    if let Some(address) = receipt.contract_address {
        info!("Receipt contract address: {address}");
    }
    Ok(())
}
