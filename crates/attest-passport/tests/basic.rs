use attest_crypto::commit::SecretKey;
use attest_passport::prelude::*;
use ed25519_dalek::SigningKey;
use rand_core::OsRng;
use serde_json::json;

fn test_signing_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

fn test_commit_key() -> SecretKey {
    SecretKey::from_prefixed("raw:test-commit-key").unwrap()
}

#[test]
fn issue_and_verify_happy_path() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({"ver": 1, "status": "ok"});

    let passport = issue_passport(&sk, &ck, "a1", "s1", &metrics, 60).unwrap();
    assert!(verify_passport(&passport, &ck, "a1", "s1", &metrics).unwrap());
}

#[test]
fn expiry_fails_without_signature_error() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({"ver": 1, "status": "ok"});

    let mut passport = issue_passport(&sk, &ck, "a1", "s1", &metrics, 1).unwrap();
    // Simulate elapsed time without sleeping the test thread.
    passport.exp = passport.issued_at - 1;
    assert!(!verify_passport(&passport, &ck, "a1", "s1", &metrics).unwrap());
}

#[test]
fn metric_soundness_rejects_different_metrics() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({"ver": 1, "status": "ok"});
    let other_metrics = json!({"ver": 1, "status": "bad"});

    let passport = issue_passport(&sk, &ck, "a1", "s1", &metrics, 60).unwrap();
    assert!(!verify_passport(&passport, &ck, "a1", "s1", &other_metrics).unwrap());
}

#[test]
fn mismatched_agent_or_session_fails() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({"ver": 1});

    let passport = issue_passport(&sk, &ck, "a1", "s1", &metrics, 60).unwrap();
    assert!(!verify_passport(&passport, &ck, "a2", "s1", &metrics).unwrap());
    assert!(!verify_passport(&passport, &ck, "a1", "s2", &metrics).unwrap());
}

#[test]
fn single_byte_signature_mutation_is_detected() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({"ver": 1});

    let mut passport = issue_passport(&sk, &ck, "a1", "s1", &metrics, 60).unwrap();
    passport.sig[0] ^= 0x01;
    assert!(!verify_passport(&passport, &ck, "a1", "s1", &metrics).unwrap());
}

#[test]
fn tampering_ttl_after_signing_is_detected() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({"ver": 1});

    let mut passport = issue_passport(&sk, &ck, "a1", "s1", &metrics, 60).unwrap();
    // The signature covers ttl_s_original verbatim; mutating it without
    // re-signing must break verification even though `exp` is untouched.
    passport.ttl_s_original = 3600;
    assert!(!verify_passport(&passport, &ck, "a1", "s1", &metrics).unwrap());
}

#[test]
fn issuance_rejects_invalid_preconditions() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({});

    assert!(issue_passport(&sk, &ck, "a1", "s1", &metrics, 0).is_err());
    assert!(issue_passport(&sk, &ck, "", "s1", &metrics, 60).is_err());
    assert!(issue_passport(&sk, &ck, "a1", "", &metrics, 60).is_err());
}

#[test]
fn commitment_only_check_is_cheap_and_correct() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({"ver": 1});
    let passport = issue_passport(&sk, &ck, "a1", "s1", &metrics, 60).unwrap();

    assert!(verify_passport_commitment_only(&passport, &ck, &metrics).unwrap());
    assert!(!verify_passport_commitment_only(&passport, &ck, &json!({"ver": 2})).unwrap());
}

#[test]
fn state_machine_reports_verified_expired_and_tampered() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let metrics = json!({"ver": 1});

    let passport = issue_passport(&sk, &ck, "a1", "s1", &metrics, 60).unwrap();
    assert_eq!(
        verify_passport_state(&passport, &ck, "a1", "s1", &metrics).unwrap(),
        PassportState::Verified
    );

    let mut expired = passport.clone();
    expired.exp = expired.issued_at - 1;
    assert_eq!(
        verify_passport_state(&expired, &ck, "a1", "s1", &metrics).unwrap(),
        PassportState::Expired
    );

    let mut tampered = passport.clone();
    tampered.sig[0] ^= 0x01;
    assert_eq!(
        verify_passport_state(&tampered, &ck, "a1", "s1", &metrics).unwrap(),
        PassportState::Tampered
    );

    assert_eq!(
        verify_passport_state(&passport, &ck, "a1", "s1", &json!({"ver": 2})).unwrap(),
        PassportState::Tampered
    );
}

#[test]
fn commitment_hiding_equal_metrics_are_indistinguishable() {
    let sk = test_signing_key();
    let ck = test_commit_key();
    let m1 = json!({"ver": 1, "status": "ok"});
    let m2 = json!({"status": "ok", "ver": 1});

    let passport = issue_passport(&sk, &ck, "a1", "s1", &m1, 60).unwrap();
    assert!(verify_passport_commitment_only(&passport, &ck, &m2).unwrap());
}
