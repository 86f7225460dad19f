use alloy::primitives::Bytes;
use alloy_sol_types::SolCall;
use eth_client_study::calldata::{bytes32_from_str, bytes32_to_string};
use eth_client_study::contracts::{CALL_GAS_LIMIT, STORE_ADDRESS, Store};
use eth_client_study::receipt::{ReceiptOutcome, ReceiptPolling};
use eth_client_study_scripts::{connect_with_account, init_logging};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client, account) = connect_with_account().await?;

    let version = client.store_version(STORE_ADDRESS).await?;
    info!("Store version: {version}");

    let key = bytes32_from_str("demo_save_key");
    let value = bytes32_from_str("demo_save_value11111");
    let input = Bytes::from(Store::setItemCall { key, value }.abi_encode());
    let tx_hash = account
        .call_contract(STORE_ADDRESS, input, CALL_GAS_LIMIT)
        .await?;
    let receipt = client
        .wait_for_transaction(tx_hash, &ReceiptPolling::default())
        .await?;
    info!("setItem {}", ReceiptOutcome::from(&receipt));

    let stored = client.store_item(STORE_ADDRESS, key).await?;
    info!("Stored value: {}", bytes32_to_string(&stored));
    Ok(())
}
