use alloy::primitives::U256;
use eth_client_study::calldata::{left_pad_32, selector};
use eth_client_study::contracts::{TOKEN_ADDRESS, TRANSFER_RECIPIENT};
use eth_client_study::receipt::{ReceiptOutcome, ReceiptPolling};
use eth_client_study_scripts::{connect_with_account, init_logging};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client, account) = connect_with_account().await?;

    let amount = U256::from(10u8).pow(U256::from(27u8));
    info!("Method ID: 0x{}", hex::encode(selector("transfer(address,uint256)")));
    info!("Padded address: 0x{}", hex::encode(left_pad_32(TRANSFER_RECIPIENT.as_slice())?));
    info!("Padded amount: 0x{}", hex::encode(amount.to_be_bytes::<32>()));

    let tx_hash = account
        .transfer_erc20_manual(TOKEN_ADDRESS, TRANSFER_RECIPIENT, amount)
        .await?;
    info!("Token transfer sent: {tx_hash}");

    let receipt = client
        .wait_for_transaction(tx_hash, &ReceiptPolling::default())
        .await?;
    info!("Token transfer {}", ReceiptOutcome::from(&receipt));
    Ok(())
}
