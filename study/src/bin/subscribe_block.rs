use eth_client_study::utils::format_timestamp;
use eth_client_study_scripts::{connect, init_logging};
use futures::StreamExt;
use log::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (config, client) = connect()?;

    let chain_id = client.chain_id().await?;
    info!("Connected, chain id: {chain_id}");

    let events = client
        .events_client_with_url(config.rpc_ws_url.clone())
        .await?;
    let mut heads = events.new_heads().await?;
    info!("Listening for new blocks (Ctrl+C to exit)...");

    while let Some(header) = heads.next().await {
        info!("==================== New block ====================");
        info!("Number: {}", header.number);
        info!("Hash: {}", header.hash);

        let block = match client.block_by_hash(header.hash).await {
            Ok(block) => block,
            Err(e) => {
                warn!("Failed to fetch full block: {e}");
                info!(
                    "Header only: number={}, hash={}, time={}",
                    header.number,
                    header.hash,
                    format_timestamp(header.timestamp)
                );
                continue;
            }
        };
        info!("Time: {}", format_timestamp(block.header.timestamp));
        info!("Difficulty: {}", block.header.difficulty);
        info!("Nonce: {}", block.header.nonce);
        if let Some(size) = block.header.size {
            info!("Size: {size} bytes");
        }
        info!("Gas limit: {}", block.header.gas_limit);
        info!("Gas used: {}", block.header.gas_used);
        info!("Miner: {}", block.header.beneficiary);
        info!("Transactions: {}", block.transactions.len());
        info!("Uncles: {}", block.uncles.len());
    }

    info!("Subscription closed");
    Ok(())
}
