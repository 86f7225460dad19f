use std::fmt;
use std::time::{Duration, Instant};

use alloy::network::ReceiptResponse;
use alloy::primitives::B256;
use alloy::rpc::types::TransactionReceipt;
use anyhow::anyhow;

use crate::resilient_provider::ResilientProvider;

/// How often, and for how long, to ask for a receipt.
#[derive(Clone, Debug)]
pub struct ReceiptPolling {
    /// Pause between two polls.
    pub interval: Duration,
    /// Give up after this long. `None` polls until the receipt shows up.
    pub timeout: Option<Duration>,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: None,
        }
    }
}

impl ReceiptPolling {
    /// Default interval with a deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }
}

/// Execution status of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptOutcome {
    /// The receipt status is 1.
    Succeeded,
    /// The transaction reverted; status 0.
    Failed,
}

impl From<&TransactionReceipt> for ReceiptOutcome {
    fn from(receipt: &TransactionReceipt) -> Self {
        if receipt.status() {
            ReceiptOutcome::Succeeded
        } else {
            ReceiptOutcome::Failed
        }
    }
}

impl fmt::Display for ReceiptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptOutcome::Succeeded => write!(f, "succeeded"),
            ReceiptOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Polls for the receipt of `tx_hash` until it is available.
///
/// A missing receipt means the transaction is not mined yet; the loop sleeps
/// for `polling.interval` and asks again. Any RPC error ends the wait.
pub async fn wait_for_receipt(
    provider: &ResilientProvider,
    tx_hash: B256,
    polling: &ReceiptPolling,
) -> anyhow::Result<TransactionReceipt> {
    let start_time = Instant::now();
    let mut polls = 0u32;

    loop {
        polls += 1;
        match provider.get_transaction_receipt(tx_hash).await? {
            Some(receipt) => {
                let outcome = ReceiptOutcome::from(&receipt);
                log::info!(
                    "Transaction {tx_hash} {outcome} in block {:?} after {polls} poll(s)",
                    receipt.block_number
                );
                return Ok(receipt);
            }
            None => {
                if let Some(timeout) = polling.timeout {
                    if start_time.elapsed() >= timeout {
                        return Err(anyhow!(
                            "Timed out after {:.1}s waiting for receipt of transaction {tx_hash}",
                            timeout.as_secs_f64()
                        ));
                    }
                }
                log::debug!("Receipt for {tx_hash} not available yet, polling again");
                tokio::time::sleep(polling.interval).await;
            }
        }
    }
}
