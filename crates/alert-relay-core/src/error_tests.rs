//! Tests for the relay error taxonomy

use super::*;

#[test]
fn test_auth_rejected_maps_to_403() {
    let error = RelayError::AuthRejected {
        reason: "auth not provided",
    };
    assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
}

#[test]
fn test_malformed_outbound_maps_to_400() {
    let error = RelayError::MalformedOutbound {
        message: "invalid downstream webhook URL: relative URL without a base".to_string(),
    };
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_delivery_failed_maps_to_500() {
    let error = RelayError::DeliveryFailed {
        message: "connection refused".to_string(),
    };
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_display_includes_rejection_reason() {
    let error = RelayError::AuthRejected {
        reason: "wrong auth",
    };
    assert_eq!(error.to_string(), "authentication rejected: wrong auth");
}

#[test]
fn test_display_includes_delivery_detail() {
    let error = RelayError::DeliveryFailed {
        message: "operation timed out".to_string(),
    };
    assert!(error.to_string().contains("operation timed out"));
}
