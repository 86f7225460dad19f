use alloy::primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use eth_client_study::contracts::{CALL_GAS_LIMIT, Counter, DEPLOY_GAS_LIMIT};
use eth_client_study::receipt::{ReceiptOutcome, ReceiptPolling};
use eth_client_study::{Account, StudyClient};
use eth_client_study_scripts::{connect_with_account, init_logging, read_bytecode};
use log::info;
use std::time::Duration;

/// File holding the hex creation code of the Counter contract.
const BYTECODE_PATH: &str = "COUNTER_BYTECODE_PATH";

async fn call_and_wait(
    client: &StudyClient,
    account: &Account,
    counter: Address,
    input: Vec<u8>,
) -> anyhow::Result<()> {
    let tx_hash = account
        .call_contract(counter, Bytes::from(input), CALL_GAS_LIMIT)
        .await?;
    let receipt = client
        .wait_for_transaction(tx_hash, &ReceiptPolling::default())
        .await?;
    info!("Transaction {tx_hash} {}", ReceiptOutcome::from(&receipt));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client, account) = connect_with_account().await?;

    let bytecode = read_bytecode(BYTECODE_PATH)?;
    let deployment = account.deploy(bytecode, DEPLOY_GAS_LIMIT).await?;
    let polling = ReceiptPolling::with_timeout(Duration::from_secs(300));
    let receipt = client
        .wait_for_transaction(deployment.tx_hash, &polling)
        .await?;
    info!(
        "Counter deployed at {} ({})",
        deployment.address,
        ReceiptOutcome::from(&receipt)
    );

    let counter = deployment.address;
    info!("Initial count: {}", client.counter_value(counter).await?);

    call_and_wait(&client, &account, counter, Counter::incrementCall {}.abi_encode()).await?;
    info!("Count after increment: {}", client.counter_value(counter).await?);

    call_and_wait(&client, &account, counter, Counter::decrementCall {}.abi_encode()).await?;
    info!("Count after decrement: {}", client.counter_value(counter).await?);
    Ok(())
}
