//! Per-request error taxonomy with HTTP status code mapping.

use http::StatusCode;

/// Failures a stage can encounter while processing one request.
///
/// Every variant maps to the status code the original caller observes:
///
/// - `403 Forbidden`: credentials absent or incorrect; the chain halts and
///   the forwarder is never invoked.
/// - `400 Bad Request`: the outbound message or request could not be
///   constructed; the chain continues without attempting delivery.
/// - `500 Internal Server Error`: the outbound call failed at the transport
///   level (connect error, 10-second timeout); the chain still completes.
///
/// # Security Considerations
///
/// The detail strings are for server-side logs only. Callers receive the
/// bare status code; no error text is ever included in the response.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Basic credentials missing or not matching the environment's pair.
    #[error("authentication rejected: {reason}")]
    AuthRejected { reason: &'static str },

    /// Outbound message serialization or request construction failed.
    ///
    /// Covers a malformed downstream webhook URL in configuration; in that
    /// case no network I/O is attempted.
    #[error("outbound construction failed: {message}")]
    MalformedOutbound { message: String },

    /// The outbound POST could not be completed.
    ///
    /// Transport-level only. A non-2xx downstream response is not a
    /// delivery failure.
    #[error("downstream delivery failed: {message}")]
    DeliveryFailed { message: String },
}

impl RelayError {
    /// The status code this failure surfaces as to the original caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthRejected { .. } => StatusCode::FORBIDDEN,
            Self::MalformedOutbound { .. } => StatusCode::BAD_REQUEST,
            Self::DeliveryFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
