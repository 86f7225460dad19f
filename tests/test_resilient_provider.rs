use alloy::eips::BlockId;
use alloy::primitives::{Address, U256};
use alloy::transports::mock::Asserter;
use eth_client_study::resilient_provider::ResilientProviderConfig;
use eth_client_study_test_utils::{fast_retry_config, init_logger, mocked_provider};

#[tokio::test]
async fn test_retries_error_sending_request() -> anyhow::Result<()> {
    init_logger(false);

    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());

    asserter.push_failure_msg("error sending request");
    asserter.push_failure_msg("error sending request");
    asserter.push_success(&U256::from(1_000u64));

    let balance = provider
        .get_balance(Address::ZERO, BlockId::latest())
        .await?;
    assert_eq!(balance, U256::from(1_000u64));
    Ok(())
}

#[tokio::test]
async fn test_gives_up_after_max_retries() -> anyhow::Result<()> {
    init_logger(false);

    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());

    for _ in 0..4 {
        asserter.push_failure_msg("error sending request");
    }

    let err = provider.get_chain_id().await.unwrap_err();
    assert!(
        err.to_string().contains("failed after 3 attempts"),
        "unexpected error: {err}"
    );
    Ok(())
}

#[tokio::test]
async fn test_other_errors_are_not_retried() -> anyhow::Result<()> {
    init_logger(false);

    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());

    asserter.push_failure_msg("header not found");
    asserter.push_success(&"0x1");

    let err = provider.get_block_number().await.unwrap_err();
    assert!(err.to_string().contains("header not found"));

    // The queued success is still there for the next call.
    assert_eq!(provider.get_block_number().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_waits_for_healthy_backend() -> anyhow::Result<()> {
    init_logger(false);

    let asserter = Asserter::new();
    let provider = mocked_provider(&asserter, fast_retry_config());

    asserter.push_failure_msg("no backend is currently healthy to serve traffic");
    asserter.push_success(&"0xaa36a7");

    assert_eq!(provider.get_chain_id().await?, 11_155_111);
    Ok(())
}

#[tokio::test]
async fn test_unhealthy_backend_times_out() -> anyhow::Result<()> {
    init_logger(false);

    let asserter = Asserter::new();
    let config = ResilientProviderConfig {
        backend_health_timeout_secs: 0,
        ..fast_retry_config()
    };
    let provider = mocked_provider(&asserter, config);

    asserter.push_failure_msg("no backend is currently healthy to serve traffic");

    let err = provider.get_gas_price().await.unwrap_err();
    assert!(err.to_string().contains("failed after 0 seconds"));
    Ok(())
}
