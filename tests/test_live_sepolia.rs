//! Queries against the public Sepolia network named by `RPC_HTTP_URL`.
//! Run with `cargo test -- --ignored`.

use eth_client_study::contracts::{
    REFERENCE_BLOCK, REFERENCE_BLOCK_HASH, REFERENCE_TX_HASH, SEPOLIA_CHAIN_ID, STORE_ADDRESS,
    TOKEN_ADDRESS, TOKEN_HOLDER,
};
use eth_client_study_test_utils::{init_logger, live_client};
use serial_test::serial;

#[tokio::test]
#[ignore]
#[serial]
async fn test_chain_and_network_id() -> anyhow::Result<()> {
    init_logger(true);

    let client = live_client()?;
    assert_eq!(client.chain_id().await?, SEPOLIA_CHAIN_ID);
    assert_eq!(client.network_id().await?, SEPOLIA_CHAIN_ID);
    Ok(())
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_reference_block() -> anyhow::Result<()> {
    init_logger(true);

    let client = live_client()?;
    let block = client.block_by_number(REFERENCE_BLOCK).await?;
    assert_eq!(block.header.number, REFERENCE_BLOCK);

    let receipts = client.block_receipts(REFERENCE_BLOCK).await?;
    assert_eq!(receipts.len(), block.transactions.len());
    log::info!(
        "Block {REFERENCE_BLOCK}: {} transactions, {} receipts",
        block.transactions.len(),
        receipts.len()
    );
    Ok(())
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_reference_transaction() -> anyhow::Result<()> {
    init_logger(true);

    let client = live_client()?;
    let lookup = client.transaction_by_hash(REFERENCE_TX_HASH).await?;
    assert!(!lookup.is_pending);

    let receipt = client.receipt(REFERENCE_TX_HASH).await?;
    assert_eq!(receipt.transaction_hash, REFERENCE_TX_HASH);

    let count = client.block_transaction_count(REFERENCE_BLOCK_HASH).await?;
    assert!(count > 0);
    Ok(())
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_contract_reads() -> anyhow::Result<()> {
    init_logger(true);

    let client = live_client()?;
    let version = client.store_version(STORE_ADDRESS).await?;
    log::info!("Store version: {version}");

    let token = client.token_info(TOKEN_ADDRESS, TOKEN_HOLDER).await?;
    log::info!(
        "{} ({}) balance: {}",
        token.name,
        token.symbol,
        token.balance_in_units()
    );
    Ok(())
}
