//! Writes and reads back a Store item twice: once through the JSON ABI and
//! once with hand-assembled call data.

use alloy::dyn_abi::{DynSolValue, FunctionExt};
use alloy::json_abi::JsonAbi;
use alloy::primitives::{B256, Bytes};
use anyhow::{Context, bail};
use eth_client_study::calldata::{
    WORD, bytes32_from_str, bytes32_to_string, encode_with_abi, store_items, store_set_item,
};
use eth_client_study::contracts::{CALL_GAS_LIMIT, STORE_ADDRESS, store_abi};
use eth_client_study::receipt::{ReceiptOutcome, ReceiptPolling};
use eth_client_study::{Account, StudyClient};
use eth_client_study_scripts::{connect_with_account, init_logging};
use log::{info, warn};

async fn write_item(client: &StudyClient, account: &Account, input: Vec<u8>) -> anyhow::Result<()> {
    let tx_hash = account
        .call_contract(STORE_ADDRESS, Bytes::from(input), CALL_GAS_LIMIT)
        .await?;
    let receipt = client
        .wait_for_transaction(tx_hash, &ReceiptPolling::default())
        .await?;
    let outcome = ReceiptOutcome::from(&receipt);
    if outcome == ReceiptOutcome::Failed {
        bail!("setItem transaction {tx_hash} failed");
    }
    info!("setItem {outcome} in block {}", receipt.block_number.unwrap_or_default());
    Ok(())
}

async fn read_with_abi(client: &StudyClient, abi: &JsonAbi, key: B256) -> anyhow::Result<B256> {
    let input = encode_with_abi(abi, "items", &[DynSolValue::FixedBytes(key, WORD)])?;
    let output = client.call(STORE_ADDRESS, Bytes::from(input)).await?;
    let items = abi
        .function("items")
        .and_then(|overloads| overloads.first())
        .context("items() missing from the Store ABI")?;
    let decoded = items.abi_decode_output(&output)?;
    match decoded.first().and_then(DynSolValue::as_fixed_bytes) {
        Some((bytes, WORD)) => Ok(B256::from_slice(bytes)),
        _ => bail!("items() returned {decoded:?}"),
    }
}

async fn read_manual(client: &StudyClient, key: B256) -> anyhow::Result<B256> {
    let output = client.call(STORE_ADDRESS, Bytes::from(store_items(key))).await?;
    if output.len() < WORD {
        bail!("items() returned {} bytes", output.len());
    }
    Ok(B256::from_slice(&output[..WORD]))
}

fn compare(expected: B256, actual: B256) {
    if expected == actual {
        info!("Read back matches: {}", bytes32_to_string(&actual));
    } else {
        warn!(
            "Read back mismatch: expected {}, got {}",
            bytes32_to_string(&expected),
            bytes32_to_string(&actual)
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client, account) = connect_with_account().await?;
    let abi = store_abi()?;

    info!("Writing through the ABI encoder");
    let key = bytes32_from_str("demo_save_key_use_abi");
    let value = bytes32_from_str("demo_save_value_use_abi_11111");
    let input = encode_with_abi(
        &abi,
        "setItem",
        &[DynSolValue::FixedBytes(key, WORD), DynSolValue::FixedBytes(value, WORD)],
    )?;
    write_item(&client, &account, input).await?;
    compare(value, read_with_abi(&client, &abi, key).await?);

    info!("Writing with hand-built call data");
    let key = bytes32_from_str("demo_save_key_no_use_abi");
    let value = bytes32_from_str("demo_save_value_no_use_abi_11111");
    write_item(&client, &account, store_set_item(key, value)).await?;
    compare(value, read_manual(&client, key).await?);
    Ok(())
}
