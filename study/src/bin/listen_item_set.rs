use anyhow::bail;
use eth_client_study::contracts::STORE_ADDRESS;
use eth_client_study_scripts::{connect, init_logging};
use futures::StreamExt;
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (config, client) = connect()?;

    let events = client
        .events_client_with_url(config.rpc_ws_url.clone())
        .await?;
    let mut stream = events.item_set_stream(STORE_ADDRESS).await?;
    info!("Listening for ItemSet events...");

    while let Some(event) = stream.next().await {
        let event = event?;
        info!("Received ItemSet event:");
        info!("  Transaction hash: {}", event.transaction_hash);
        info!("  Block number: {}", event.block_number);
        info!("  Key: {}", event.key_text());
        info!("  Value: {}", event.value_text());
    }

    bail!("ItemSet subscription ended")
}
