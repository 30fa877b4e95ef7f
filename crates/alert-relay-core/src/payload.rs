//! # Payload Transformation
//!
//! Decodes the inbound request body into a tagged variant and builds the
//! fixed-shape outbound chat message from it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Link to the error-report console, interpolated with the project label.
const ERROR_REPORTS_URL: &str = "https://console.cloud.google.com/errors?project=";

// ============================================================================
// Formatting Policy
// ============================================================================

/// How a successfully parsed JSON body becomes the outbound `content`.
///
/// Configured per environment; the two historical deployment variants
/// (incident-formatting vs. straight forwarding) are unified behind this
/// switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormattingPolicy {
    /// Extract `incident.resource_name` / `incident.url` and format the
    /// three-line alert message.
    #[default]
    IncidentAware,

    /// Forward the entire parsed JSON value unmodified.
    PassThrough,
}

// ============================================================================
// Inbound Payload
// ============================================================================

/// The fields extracted from a monitoring-alert incident notification.
///
/// Extra fields in the incident object are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncidentDetails {
    pub resource_name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct IncidentEnvelope {
    incident: IncidentDetails,
}

/// Tagged-variant decode of the raw inbound body.
///
/// The incident shape is recognized only when the top-level `incident` key
/// decodes to [`IncidentDetails`]; any other JSON value is kept opaque, and
/// bytes that are not valid JSON are carried verbatim as text.
#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// Top-level `incident` object with the expected string fields.
    /// `raw` keeps the full parsed value for pass-through forwarding.
    Incident { details: IncidentDetails, raw: Value },

    /// Any other valid JSON value.
    Opaque(Value),

    /// Body that is not valid JSON (lossy UTF-8).
    Text(String),
}

impl InboundPayload {
    pub fn decode(body: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            // assume not json
            Err(_) => return Self::Text(String::from_utf8_lossy(body).into_owned()),
        };

        match IncidentEnvelope::deserialize(&value) {
            Ok(envelope) => Self::Incident {
                details: envelope.incident,
                raw: value,
            },
            Err(_) => Self::Opaque(value),
        }
    }
}

// ============================================================================
// Outbound Message
// ============================================================================

/// The wire format expected by the downstream chat webhook.
///
/// `content` is a string for text and incident-formatted bodies, or the
/// parsed JSON value when forwarding pass-through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub content: Value,
}

impl OutboundMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Value::String(content.into()),
        }
    }

    pub fn json(content: Value) -> Self {
        Self { content }
    }

    /// Build the outbound message for one decoded payload under the
    /// environment's formatting policy.
    ///
    /// Under [`FormattingPolicy::IncidentAware`], a JSON body that does not
    /// match the incident shape falls back to pass-through forwarding with a
    /// warn log rather than failing the request.
    pub fn from_payload(
        payload: InboundPayload,
        policy: FormattingPolicy,
        project_label: &str,
    ) -> Self {
        match payload {
            InboundPayload::Text(text) => Self::text(text),
            InboundPayload::Incident { details, raw } => match policy {
                FormattingPolicy::IncidentAware => {
                    Self::text(format_incident_message(&details, project_label))
                }
                FormattingPolicy::PassThrough => Self::json(raw),
            },
            InboundPayload::Opaque(value) => {
                if policy == FormattingPolicy::IncidentAware {
                    warn!("JSON payload does not match the incident shape; forwarding as-is");
                }
                Self::json(value)
            }
        }
    }
}

/// Format the fixed three-line incident alert message.
pub fn format_incident_message(details: &IncidentDetails, project_label: &str) -> String {
    format!(
        "New incident in {}\nView Error details {}\nAll Error reports {}{}",
        details.resource_name, details.url, ERROR_REPORTS_URL, project_label
    )
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
