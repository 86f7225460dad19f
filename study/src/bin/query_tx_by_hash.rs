use eth_client_study::contracts::REFERENCE_TX_HASH;
use eth_client_study_scripts::{connect, init_logging, log_receipt, log_transaction};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client) = connect()?;

    let lookup = client.transaction_by_hash(REFERENCE_TX_HASH).await?;
    info!("Pending: {}", lookup.is_pending);
    log_transaction(&lookup.transaction);

    let receipt = client.receipt(REFERENCE_TX_HASH).await?;
    log_receipt(&receipt);
    Ok(())
}
