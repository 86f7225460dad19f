use eth_client_study::config::env_var;
use eth_client_study::contracts::STORE_ADDRESS;
use eth_client_study::{EventsClient, ItemSetEvent};
use eth_client_study_scripts::{connect, follow_with_resubscribe, init_logging};
use log::{info, warn};
use std::time::Duration;

/// First block of the optional history query.
const FROM_BLOCK: &str = "ITEM_SET_FROM_BLOCK";
/// Last block of the history query, `0` for latest.
const TO_BLOCK: &str = "ITEM_SET_TO_BLOCK";
/// Pause before each resubscription attempt.
const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(1);

async fn print_history(events: &EventsClient) -> anyhow::Result<()> {
    let Ok(from) = env_var(FROM_BLOCK) else {
        return Ok(());
    };
    let from: u64 = from.parse()?;
    let to: u64 = env_var(TO_BLOCK).map_or(Ok(0), |to| to.parse())?;

    let history: Vec<ItemSetEvent> = events.item_set_history(STORE_ADDRESS, from, to).await?;
    info!("Found {} past ItemSet events", history.len());
    for event in &history {
        info!("{event}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let (config, client) = connect()?;

    let events = client
        .events_client_with_url(config.rpc_ws_url.clone())
        .await?;
    print_history(&events).await?;

    info!("Listening for ItemSet events...");
    let events = &events;
    follow_with_resubscribe(
        move || events.item_set_stream(STORE_ADDRESS),
        |event| match event {
            Ok(event) => info!(
                "New event: block={}, tx={}, key={}, value={}",
                event.block_number,
                event.transaction_hash,
                hex::encode(event.key),
                hex::encode(event.value)
            ),
            Err(e) => warn!("Failed to decode event: {e}"),
        },
        RESUBSCRIBE_DELAY,
        None,
    )
    .await;
    Ok(())
}
