use attest_errors::prelude::*;
use serde_json::json;

#[test]
fn build_and_render_public() {
    let err = ErrorBuilder::new(codes::BAD_SIGNATURE)
        .user_msg("Signature verification failed.")
        .dev_msg("ed25519 verify returned false")
        .meta_kv("jti", json!("tok-123"))
        .correlation("req-123")
        .build();

    let public_view = err.to_public();
    assert_eq!(public_view.code, "BAD_SIGNATURE");
    assert_eq!(public_view.message, "Signature verification failed.");
    assert_eq!(public_view.correlation_id.as_deref(), Some("req-123"));

    let labels = labels(&err);
    assert_eq!(labels.get("code").unwrap(), "BAD_SIGNATURE");
    assert_eq!(labels.get("jti").unwrap(), "\"tok-123\"");
}

#[test]
fn internal_never_leaks_dev_message_by_default() {
    let err = ErrorBuilder::new(codes::INTERNAL).correlation("req-9").build();
    let public_view = err.to_public();
    assert_eq!(public_view.message, "Internal error. Please retry later.");
    assert!(err.message_dev.is_none());
}

#[test]
fn quorum_insufficient_is_forbidden_and_permanent() {
    let err = ErrorBuilder::new(codes::QUORUM_INSUFFICIENT).build();
    assert_eq!(err.http_status, 403);
    assert_eq!(RetryClass::as_str(err.retryable), "permanent");
}

#[cfg(feature = "http")]
#[test]
fn http_status_mapping() {
    let err = ErrorBuilder::new(codes::JWKS_UNAVAILABLE).build();
    let status = attest_errors::mapping_http::to_http_status(&err);
    assert_eq!(status.as_u16(), 502);
}
