// Path: crates/ledger-client-core/src/receipt.rs
//! The Receipt Poller: polls a query transport for a transaction's receipt
//! until a terminal status is observed or a wall-clock deadline elapses.

use crate::error::ReceiptError;
use crate::model::{status_from_code, ReceiptStatus, TransactionId, TransactionReceipt};
use std::time::{Duration, Instant};

/// Bounds on the poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Total wall-clock budget across all poll attempts.
    pub timeout: Duration,
    /// Delay between successive poll attempts.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_millis(500),
        }
    }
}

/// One query attempt's outcome: a raw status label plus enough to build a
/// [`TransactionReceipt`]. Kept generic over a fetch closure so the poller
/// has no direct dependency on a transport or transaction id encoding.
pub type FetchReceipt<'a> =
    dyn Fn() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, ReceiptError>> + Send + 'a>>
        + Send
        + Sync
        + 'a;

/// Polls `fetch` (expected to issue one receipt query and return the raw
/// status label) on `config.interval` until it reports a terminal status
/// or `config.timeout` elapses.
pub async fn poll_receipt(
    transaction_id: TransactionId,
    config: PollConfig,
    fetch: &FetchReceipt<'_>,
) -> Result<TransactionReceipt, ReceiptError> {
    if config.timeout.is_zero() {
        return Err(ReceiptError::InvalidReceiptTimeout);
    }
    if config.interval.is_zero() {
        return Err(ReceiptError::InvalidPollInterval);
    }

    let deadline = Instant::now() + config.timeout;
    loop {
        let status_label = fetch().await?;
        let status = status_from_code(&status_label);
        if !status.is_pollable() {
            return Ok(TransactionReceipt {
                status,
                status_label,
                transaction_id,
            });
        }

        if Instant::now() + config.interval >= deadline {
            tracing::warn!(
                target: "ledger_client::receipt",
                transaction_id = %transaction_id,
                "receipt poll timed out before a terminal status was observed"
            );
            return Err(ReceiptError::ReceiptTimedOut);
        }
        tracing::trace!(target: "ledger_client::receipt", transaction_id = %transaction_id, "receipt not yet available, polling again");
        tokio::time::sleep(config.interval).await;
    }
}

/// A poller bound to a query closure, for callers that want an owned value
/// (e.g. stashed on a `Client`) rather than passing the closure at every call.
pub struct ReceiptPoller<F> {
    config: PollConfig,
    fetch: F,
}

impl<F> ReceiptPoller<F>
where
    F: Fn(TransactionId) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, ReceiptError>> + Send>>
        + Send
        + Sync,
{
    /// Builds a poller with the given configuration and fetch closure.
    pub fn new(config: PollConfig, fetch: F) -> Self {
        Self { config, fetch }
    }

    /// Polls until a terminal receipt status or timeout, per [`poll_receipt`].
    pub async fn poll(&self, transaction_id: TransactionId) -> Result<TransactionReceipt, ReceiptError> {
        if self.config.timeout.is_zero() {
            return Err(ReceiptError::InvalidReceiptTimeout);
        }
        if self.config.interval.is_zero() {
            return Err(ReceiptError::InvalidPollInterval);
        }

        let deadline = Instant::now() + self.config.timeout;
        loop {
            let status_label = (self.fetch)(transaction_id).await?;
            let status = status_from_code(&status_label);
            if !status.is_pollable() {
                return Ok(TransactionReceipt {
                    status,
                    status_label,
                    transaction_id,
                });
            }

            if Instant::now() + self.config.interval >= deadline {
                return Err(ReceiptError::ReceiptTimedOut);
            }
            tokio::time::sleep(self.config.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityId;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn tx_id() -> TransactionId {
        TransactionId::new(EntityId::num(100), crate::model::Timestamp::new(1, 0))
    }

    #[tokio::test]
    async fn returns_immediately_on_first_success() {
        let fetch: &FetchReceipt = &|| Box::pin(async { Ok("SUCCESS".to_string()) });
        let receipt = poll_receipt(tx_id(), PollConfig::default(), fetch).await.unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_terminal_status() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_captured = calls.clone();
        let fetch: &FetchReceipt = &move || {
            let calls = calls_captured.clone();
            Box::pin(async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Ok("UNKNOWN".to_string())
                } else {
                    Ok("SUCCESS".to_string())
                }
            })
        };
        let config = PollConfig {
            timeout: Duration::from_secs(10),
            interval: Duration::from_millis(10),
        };
        let receipt = poll_receipt(tx_id(), config, fetch).await.unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_if_status_never_turns_terminal() {
        let fetch: &FetchReceipt = &|| Box::pin(async { Ok("UNKNOWN".to_string()) });
        let config = PollConfig {
            timeout: Duration::from_millis(50),
            interval: Duration::from_millis(20),
        };
        let result = poll_receipt(tx_id(), config, fetch).await;
        assert!(matches!(result, Err(ReceiptError::ReceiptTimedOut)));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausting_a_hundred_pending_responses_under_a_five_ms_timeout_times_out() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_captured = calls.clone();
        let fetch: &FetchReceipt = &move || {
            let calls = calls_captured.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("UNKNOWN".to_string())
            })
        };
        let config = PollConfig {
            timeout: Duration::from_millis(5),
            interval: Duration::from_millis(2),
        };
        let result = poll_receipt(tx_id(), config, fetch).await;
        assert!(matches!(result, Err(ReceiptError::ReceiptTimedOut)));
        assert!(calls.load(Ordering::SeqCst) <= 100);
    }

    #[tokio::test]
    async fn zero_timeout_is_rejected() {
        let fetch: &FetchReceipt = &|| Box::pin(async { Ok("SUCCESS".to_string()) });
        let config = PollConfig {
            timeout: Duration::ZERO,
            interval: Duration::from_millis(10),
        };
        assert!(matches!(
            poll_receipt(tx_id(), config, fetch).await,
            Err(ReceiptError::InvalidReceiptTimeout)
        ));
    }
}
