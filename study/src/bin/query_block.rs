use eth_client_study::utils::format_timestamp;
use eth_client_study_scripts::{connect, init_logging};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client) = connect()?;

    let header = client.header(None).await?;
    info!("Latest block: {}", header.number);
    info!("Timestamp: {} ({})", header.timestamp, format_timestamp(header.timestamp));
    info!("Difficulty: {}", header.difficulty);
    info!("Hash: {}", header.hash);

    let block = client.block_by_number(header.number).await?;
    info!("Block {} has {} transactions", block.header.number, block.transactions.len());

    let count = client.block_transaction_count(block.header.hash).await?;
    info!("Transaction count by hash: {count}");
    Ok(())
}
