use alloy::network::TransactionResponse;
use eth_client_study::contracts::{REFERENCE_BLOCK, REFERENCE_BLOCK_HASH, REFERENCE_TX_HASH};
use eth_client_study_scripts::{connect, init_logging, log_receipt, log_transaction};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client) = connect()?;

    let chain_id = client.chain_id().await?;
    info!("Chain id: {chain_id}");

    let block = client.block_by_number(REFERENCE_BLOCK).await?;
    for tx in block.transactions.txns() {
        log_transaction(tx);
        let receipt = client.receipt(tx.tx_hash()).await?;
        log_receipt(&receipt);
    }

    let count = client.block_transaction_count(REFERENCE_BLOCK_HASH).await?;
    if count > 0 {
        let first = client.transaction_in_block(REFERENCE_BLOCK_HASH, 0).await?;
        info!("First transaction in block: {}", first.tx_hash());
    }

    let lookup = client.transaction_by_hash(REFERENCE_TX_HASH).await?;
    info!("Pending: {}", lookup.is_pending);
    info!("Transaction hash: {}", lookup.transaction.tx_hash());
    Ok(())
}
