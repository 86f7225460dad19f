use std::time::Duration;

use alloy::primitives::{Address, B256};
use alloy::transports::mock::Asserter;
use eth_client_study::receipt::{ReceiptOutcome, ReceiptPolling, wait_for_receipt};
use eth_client_study_test_utils::{fast_retry_config, init_logger, mocked_provider, receipt_json};

fn quick_polling(timeout: Option<Duration>) -> ReceiptPolling {
    ReceiptPolling {
        interval: Duration::from_millis(1),
        timeout,
    }
}

#[tokio::test]
async fn test_polls_until_receipt_appears() -> anyhow::Result<()> {
    init_logger(false);

    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());
    let tx_hash = B256::repeat_byte(0x20);
    let (from, to) = (Address::repeat_byte(0x01), Address::repeat_byte(0x02));

    asserter.push_success(&Option::<()>::None);
    asserter.push_success(&Option::<()>::None);
    asserter.push_success(&receipt_json(tx_hash, from, to, true));

    let receipt = wait_for_receipt(&provider, tx_hash, &quick_polling(None)).await?;
    assert_eq!(receipt.transaction_hash, tx_hash);
    assert_eq!(receipt.block_number, Some(0x568b40));
    assert_eq!(ReceiptOutcome::from(&receipt), ReceiptOutcome::Succeeded);
    Ok(())
}

#[tokio::test]
async fn test_reverted_transaction_is_reported_as_failed() -> anyhow::Result<()> {
    init_logger(false);

    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());
    let tx_hash = B256::repeat_byte(0x21);

    asserter.push_success(&receipt_json(tx_hash, Address::ZERO, Address::ZERO, false));

    let receipt = wait_for_receipt(&provider, tx_hash, &quick_polling(None)).await?;
    assert_eq!(ReceiptOutcome::from(&receipt), ReceiptOutcome::Failed);
    assert_eq!(ReceiptOutcome::Failed.to_string(), "failed");
    Ok(())
}

#[tokio::test]
async fn test_times_out_naming_the_transaction() {
    init_logger(false);

    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());
    let tx_hash = B256::repeat_byte(0x22);

    asserter.push_success(&Option::<()>::None);

    let err = wait_for_receipt(&provider, tx_hash, &quick_polling(Some(Duration::ZERO)))
        .await
        .unwrap_err();
    assert!(err.to_string().contains(&tx_hash.to_string()));
}

#[tokio::test]
async fn test_rpc_error_ends_the_wait() {
    init_logger(false);

    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());

    asserter.push_success(&Option::<()>::None);
    asserter.push_failure_msg("transaction indexing is in progress");

    let err = wait_for_receipt(&provider, B256::ZERO, &quick_polling(None))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("indexing"));
}

#[test]
fn test_default_polling_interval_is_one_second() {
    let polling = ReceiptPolling::default();
    assert_eq!(polling.interval, Duration::from_secs(1));
    assert!(polling.timeout.is_none());

    let bounded = ReceiptPolling::with_timeout(Duration::from_secs(300));
    assert_eq!(bounded.timeout, Some(Duration::from_secs(300)));
}
