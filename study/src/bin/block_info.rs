use eth_client_study::contracts::REFERENCE_BLOCK;
use eth_client_study::utils::format_timestamp;
use eth_client_study_scripts::{connect, init_logging};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client) = connect()?;

    let block = client.block_by_number(REFERENCE_BLOCK).await?;
    let header = &block.header;
    info!("Block number: {}", header.number);
    info!("Block hash: {}", header.hash);
    info!("Parent hash: {}", header.parent_hash);
    info!("Time: {}", format_timestamp(header.timestamp));
    info!("Miner: {}", header.beneficiary);
    info!("Gas used: {} / {}", header.gas_used, header.gas_limit);
    if let Some(base_fee) = header.base_fee_per_gas {
        info!("Base fee: {base_fee} wei");
    }
    info!("Transactions: {}", block.transactions.len());
    Ok(())
}
