use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolValue;
use bigdecimal::BigDecimal;
use eth_client_study::calldata::bytes32_from_str;
use eth_client_study::contracts::{BALANCE_ACCOUNT, STORE_ADDRESS, TOKEN_ADDRESS, TOKEN_HOLDER};
use eth_client_study_test_utils::{init_logger, mocked_client, receipt_json, transaction_json};
use std::str::FromStr;

#[tokio::test]
async fn test_balance_in_eth() -> anyhow::Result<()> {
    init_logger(false);

    let (asserter, client) = mocked_client();
    asserter.push_success(&U256::from(664_000_000_000_000_000u128));

    let balance = client.balance_eth(BALANCE_ACCOUNT).await?;
    assert_eq!(balance, BigDecimal::from_str("0.664")?);
    Ok(())
}

#[tokio::test]
async fn test_token_info_scales_by_decimals() -> anyhow::Result<()> {
    init_logger(false);

    let (asserter, client) = mocked_client();
    asserter.push_success(&Bytes::from("Study Token".to_string().abi_encode()));
    asserter.push_success(&Bytes::from("STK".to_string().abi_encode()));
    asserter.push_success(&Bytes::from(U256::from(6u8).abi_encode()));
    asserter.push_success(&Bytes::from(U256::from(2_500_000u64).abi_encode()));

    let info = client.token_info(TOKEN_ADDRESS, TOKEN_HOLDER).await?;
    assert_eq!(info.name, "Study Token");
    assert_eq!(info.symbol, "STK");
    assert_eq!(info.decimals, 6);
    assert_eq!(info.balance, U256::from(2_500_000u64));
    assert_eq!(info.balance_in_units(), BigDecimal::from_str("2.5")?);
    Ok(())
}

#[tokio::test]
async fn test_store_item_read() -> anyhow::Result<()> {
    init_logger(false);

    let (asserter, client) = mocked_client();
    let value = bytes32_from_str("bar");
    asserter.push_success(&Bytes::from(value.abi_encode()));

    let item = client.store_item(STORE_ADDRESS, bytes32_from_str("foo")).await?;
    assert_eq!(item, value);
    Ok(())
}

#[tokio::test]
async fn test_undecodable_call_output() {
    init_logger(false);

    let (asserter, client) = mocked_client();
    asserter.push_success(&Bytes::new());

    let err = client.store_version(STORE_ADDRESS).await.unwrap_err();
    assert!(err.to_string().contains("version()"));
}

#[tokio::test]
async fn test_transaction_lookup_reports_pending() -> anyhow::Result<()> {
    init_logger(false);

    let (asserter, client) = mocked_client();
    let hash = B256::repeat_byte(0x20);
    let (from, to) = (Address::repeat_byte(0x01), Address::repeat_byte(0x02));
    asserter.push_success(&transaction_json(hash, from, to, None));
    asserter.push_success(&transaction_json(hash, from, to, Some(5_671_744)));

    let pending = client.transaction_by_hash(hash).await?;
    assert!(pending.is_pending);

    let mined = client.transaction_by_hash(hash).await?;
    assert!(!mined.is_pending);
    assert_eq!(mined.transaction.block_number, Some(5_671_744));
    Ok(())
}

#[tokio::test]
async fn test_unknown_transaction_is_an_error() {
    init_logger(false);

    let (asserter, client) = mocked_client();
    asserter.push_success(&Option::<()>::None);

    let hash = B256::repeat_byte(0x99);
    let err = client.transaction_by_hash(hash).await.unwrap_err();
    assert_eq!(err.to_string(), format!("Transaction {hash} not found"));
}

#[tokio::test]
async fn test_block_receipts() -> anyhow::Result<()> {
    init_logger(false);

    let (asserter, client) = mocked_client();
    let (from, to) = (Address::repeat_byte(0x01), Address::repeat_byte(0x02));
    asserter.push_success(&vec![
        receipt_json(B256::repeat_byte(0x01), from, to, true),
        receipt_json(B256::repeat_byte(0x02), from, to, false),
    ]);

    let receipts = client.block_receipts(5_671_744).await?;
    assert_eq!(receipts.len(), 2);
    assert!(receipts[0].status());
    assert!(!receipts[1].status());
    Ok(())
}

#[tokio::test]
async fn test_account_uses_node_chain_id() -> anyhow::Result<()> {
    init_logger(false);

    let (asserter, client) = mocked_client();
    asserter.push_success(&"0xaa36a7");

    let signer = eth_client_study_test_utils::DEV_PRIVATE_KEY.parse()?;
    let account = client.account(signer).await?;
    assert_eq!(account.chain_id, 11_155_111);
    Ok(())
}

#[test]
fn test_builder_keeps_retry_config() -> anyhow::Result<()> {
    let url = eth_client_study::Url::parse(eth_client_study_test_utils::LOCAL_RPC_URL)?;
    let client = eth_client_study::StudyClient::builder()
        .rpc_url(url.clone())
        .retry_config(eth_client_study_test_utils::fast_retry_config())
        .build();
    assert_eq!(client.rpc_url(), &url);
    assert_eq!(client.provider().config().retry_delay_ms, 1);

    let default = eth_client_study::StudyClient::new(url);
    assert_eq!(default.provider().config().max_retries, 3);
    Ok(())
}
