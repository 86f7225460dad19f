use eth_client_study::contracts::REFERENCE_BLOCK;
use eth_client_study_scripts::{connect, init_logging};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client) = connect()?;

    let receipts = client.block_receipts(REFERENCE_BLOCK).await?;
    info!("Block {REFERENCE_BLOCK} has {} receipts", receipts.len());
    info!("Receipts: {}", serde_json::to_string(&receipts)?);
    Ok(())
}
