//! Bounded, cancellable wait for a product to leave a `*_generating` status.
//!
//! The external service reports completion by writing the product's status.
//! [`CompletionWatcher`] re-reads the product with exponential backoff until
//! the status settles, the timeout elapses, or the caller cancels.

use std::sync::Arc;
use std::time::Duration;

use adforge_core::product_status::ProductStatus;
use adforge_core::types::DbId;
use adforge_db::Store;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Backoff and deadline for status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            timeout: Duration::from_secs(120),
        }
    }
}

impl PollPolicy {
    /// Delay after `current`: doubled, capped at `max_delay`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("Entity not found: Product with id {0}")]
    NotFound(DbId),

    #[error("Timed out waiting for product {product_id} to finish generating")]
    TimedOut {
        product_id: DbId,
        /// Status seen on the last successful read, if any.
        last_status: Option<ProductStatus>,
    },

    #[error("Wait cancelled")]
    Cancelled,
}

pub struct CompletionWatcher {
    store: Arc<dyn Store>,
    policy: PollPolicy,
}

impl CompletionWatcher {
    pub fn new(store: Arc<dyn Store>, policy: PollPolicy) -> Self {
        Self { store, policy }
    }

    /// Wait using the policy's own timeout.
    pub async fn wait_for_settled(
        &self,
        product_id: DbId,
        cancel: &CancellationToken,
    ) -> Result<ProductStatus, WaitError> {
        self.wait_with_timeout(product_id, self.policy.timeout, cancel)
            .await
    }

    /// Wait at most `timeout` for the product to settle.
    pub async fn wait_with_timeout(
        &self,
        product_id: DbId,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<ProductStatus, WaitError> {
        let deadline = Instant::now() + timeout;
        let mut delay = self.policy.initial_delay;
        let mut last_status = None;

        loop {
            match self.store.find_product(product_id).await {
                Ok(Some(product)) if !product.status.is_generating() => {
                    tracing::debug!(product_id, status = %product.status, "Product settled");
                    return Ok(product.status);
                }
                Ok(Some(product)) => last_status = Some(product.status),
                Ok(None) => return Err(WaitError::NotFound(product_id)),
                Err(e) => {
                    tracing::warn!(product_id, error = %e, "Status poll failed; will retry");
                }
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::info!(product_id, ?last_status, "Gave up waiting for product");
                return Err(WaitError::TimedOut {
                    product_id,
                    last_status,
                });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(WaitError::Cancelled),
                _ = tokio::time::sleep(delay.min(deadline - now)) => {}
            }
            delay = self.policy.next_delay(delay);
        }
    }
}
