use eth_client_study::contracts::{TOKEN_ADDRESS, TOKEN_HOLDER};
use eth_client_study_scripts::{connect, init_logging};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (_, client) = connect()?;

    let token = client.token_info(TOKEN_ADDRESS, TOKEN_HOLDER).await?;
    info!("Balance of {TOKEN_HOLDER}: {}", token.balance);
    info!("Balance in tokens: {}", token.balance_in_units());
    info!("Name: {}", token.name);
    info!("Symbol: {}", token.symbol);
    info!("Decimals: {}", token.decimals);
    Ok(())
}
