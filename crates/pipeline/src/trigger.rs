//! Outbound calls to the external generation service.
//!
//! [`WebhookTrigger`] POSTs a JSON-encoded [`GenerationRequest`] to the
//! configured URL. A 2xx response means the request was accepted, not that
//! the work is done. There is exactly one attempt per request.

use std::time::Duration;

use adforge_core::generation::GenerationRequest;
use async_trait::async_trait;

/// Default HTTP request timeout for a single trigger call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for trigger failures.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Generation webhook returned HTTP {0}")]
    HttpStatus(u16),

    #[error("No generation webhook URL is configured")]
    NotConfigured,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Something that can hand a generation request to the external service.
#[async_trait]
pub trait GenerationTrigger: Send + Sync {
    async fn fire(&self, request: &GenerationRequest) -> Result<(), TriggerError>;
}

// ---------------------------------------------------------------------------
// WebhookTrigger
// ---------------------------------------------------------------------------

/// Fires generation requests at a webhook endpoint.
pub struct WebhookTrigger {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookTrigger {
    /// Build a trigger for `url` with a per-request `timeout`.
    ///
    /// With `url = None` every call fails with [`TriggerError::NotConfigured`].
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, TriggerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

#[async_trait]
impl GenerationTrigger for WebhookTrigger {
    async fn fire(&self, request: &GenerationRequest) -> Result<(), TriggerError> {
        let url = self.url.as_deref().ok_or(TriggerError::NotConfigured)?;

        let response = self.client.post(url).json(request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(
                url,
                action = request.action(),
                status,
                "Generation webhook rejected request",
            );
            return Err(TriggerError::HttpStatus(status));
        }

        tracing::debug!(url, action = request.action(), "Generation request accepted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
