//! # Webhook Forwarder
//!
//! Terminal stage of every environment chain: converts the inbound body into
//! a single outbound chat message and delivers it to the environment's
//! downstream webhook.
//!
//! Delivery never fails the original request. Each failure mode sets a
//! status code on the context and lets the chain complete:
//!
//! | Failure | Status | Delivery attempted |
//! |---------|--------|--------------------|
//! | Message serialization | 400 | no |
//! | Malformed downstream URL | 400 | no |
//! | Transport error / timeout | 500 | yes |
//!
//! A non-2xx downstream response is not a failure; it is logged and the
//! inbound response stays `200 OK`.

use crate::error::RelayError;
use crate::payload::{FormattingPolicy, InboundPayload, OutboundMessage};
use crate::pipeline::{RelayContext, RelayStage, StageFlow};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Upper bound on one outbound delivery attempt.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// A [`RelayStage`] that transforms and delivers the inbound payload.
///
/// Holds one environment's immutable delivery settings plus a shared
/// [`reqwest::Client`]; the client is built once at startup and reused
/// across environments and requests.
#[derive(Debug, Clone)]
pub struct WebhookForwarder {
    client: reqwest::Client,
    webhook_url: String,
    project_label: String,
    policy: FormattingPolicy,
    timeout: Duration,
}

impl WebhookForwarder {
    pub fn new(
        client: reqwest::Client,
        webhook_url: String,
        project_label: String,
        policy: FormattingPolicy,
    ) -> Self {
        Self {
            client,
            webhook_url,
            project_label,
            policy,
            timeout: DELIVERY_TIMEOUT,
        }
    }

    /// Override the per-attempt delivery timeout.
    ///
    /// The default is the 10-second bound every production deployment uses;
    /// a shorter value is only useful to exercise the timeout path quickly.
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// POST the serialized message to the downstream webhook.
    ///
    /// The URL is parsed before any request is built, so a malformed
    /// configured URL maps to [`RelayError::MalformedOutbound`] without
    /// network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MalformedOutbound`] when the message cannot be
    /// serialized or the URL cannot be parsed, and
    /// [`RelayError::DeliveryFailed`] on transport-level send failures.
    async fn deliver(&self, message: &OutboundMessage) -> Result<reqwest::StatusCode, RelayError> {
        let body = serde_json::to_vec(message).map_err(|e| RelayError::MalformedOutbound {
            message: format!("message serialization failed: {}", e),
        })?;

        let url = Url::parse(&self.webhook_url).map_err(|e| RelayError::MalformedOutbound {
            message: format!("invalid downstream webhook URL: {}", e),
        })?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RelayError::DeliveryFailed {
                message: e.to_string(),
            })?;

        Ok(response.status())
    }
}

#[async_trait]
impl RelayStage for WebhookForwarder {
    /// Transform the inbound body and attempt delivery.
    ///
    /// Always returns [`StageFlow::Continue`]: the inbound request is never
    /// blocked on delivery success, only its status code reflects the
    /// outcome.
    #[instrument(skip(self, ctx), fields(policy = ?self.policy))]
    async fn handle(&self, ctx: &mut RelayContext) -> StageFlow {
        let payload = InboundPayload::decode(&ctx.body);
        let message = OutboundMessage::from_payload(payload, self.policy, &self.project_label);

        match self.deliver(&message).await {
            Ok(status) if status.is_success() => {
                info!(downstream_status = %status, "Delivered message to downstream webhook");
            }
            Ok(status) => {
                // Transport succeeded; the downstream verdict is its own concern.
                warn!(downstream_status = %status, "Downstream webhook returned non-success status");
            }
            Err(error) => {
                info!(error = %error, "Webhook delivery not completed");
                ctx.status = error.status_code();
            }
        }

        StageFlow::Continue
    }
}

#[cfg(test)]
#[path = "forwarder_tests.rs"]
mod tests;
