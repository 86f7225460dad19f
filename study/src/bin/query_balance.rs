use eth_client_study::contracts::{BALANCE_ACCOUNT, HISTORICAL_BALANCE_BLOCK};
use eth_client_study::utils::wei_to_eth;
use eth_client_study_scripts::{connect, init_logging};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client) = connect()?;

    let balance = client.balance(BALANCE_ACCOUNT).await?;
    info!("Balance of {BALANCE_ACCOUNT}: {balance} wei");

    let historical = client
        .balance_at(BALANCE_ACCOUNT, HISTORICAL_BALANCE_BLOCK)
        .await?;
    info!("Balance at block {HISTORICAL_BALANCE_BLOCK}: {historical} wei");
    info!("Balance at block {HISTORICAL_BALANCE_BLOCK}: {} ETH", wei_to_eth(historical));

    let pending = client.pending_balance(BALANCE_ACCOUNT).await?;
    info!("Pending balance: {pending} wei");
    Ok(())
}
