use bigdecimal::BigDecimal;
use eth_client_study::contracts::TRANSFER_RECIPIENT;
use eth_client_study::receipt::{ReceiptOutcome, ReceiptPolling};
use eth_client_study::utils::eth_to_wei;
use eth_client_study_scripts::{connect_with_account, init_logging};
use log::info;
use std::str::FromStr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (config, client, account) = connect_with_account().await?;

    let to = config.recipient().unwrap_or(TRANSFER_RECIPIENT);
    let value = eth_to_wei(BigDecimal::from_str("0.001")?)?;
    info!("Sending {value} wei to {to}");

    let tx_hash = account.transfer_eth(to, value).await?;
    let receipt = client
        .wait_for_transaction(tx_hash, &ReceiptPolling::default())
        .await?;
    info!(
        "Transfer {} in block {}",
        ReceiptOutcome::from(&receipt),
        receipt.block_number.unwrap_or_default()
    );
    Ok(())
}
