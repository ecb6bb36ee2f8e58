use attest_crypto::commit::SecretKey;
use attest_ledger::prelude::*;
use serde_json::json;

fn audit_key() -> SecretKey {
    SecretKey::from_prefixed("raw:audit-secret-key-material").unwrap()
}

#[test]
fn quorum_scenario_from_spec() {
    assert!(quorum_3_of_5(&owned(&["alice", "alice", "bob", "carol"])));
    assert!(!quorum_3_of_5(&owned(&["alice", "", "bob", ""])));
    assert!(quorum_3_of_5(&owned(&["a", "b", "c", "d", "e"])));
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn revocation_is_idempotent() {
    let ledger = InMemoryLedger::new();
    assert!(!ledger.is_revoked("jti-1"));

    let first = ledger.revoke("jti-1", Some("compromised".into()), Some("alice".into()));
    let second = ledger.revoke("jti-1", Some("different reason".into()), Some("bob".into()));

    assert_eq!(first, second);
    assert!(ledger.is_revoked("jti-1"));
}

#[test]
fn passport_record_round_trips() {
    let ledger = InMemoryLedger::new();
    let record = PassportRecord {
        jti: "jti-2".into(),
        sub: "agent-1".into(),
        org_id: None,
        scope: vec!["tool:read".into()],
        kid: 1,
        iat: 1_700_000_000,
        exp: 1_700_000_060,
        nonce: "abc123".into(),
        ip_hash: Some("deadbeef".into()),
        metrics_tag: "tag".into(),
        sig: "sig-bytes".into(),
    };

    ledger.record_passport(record.clone()).unwrap();
    assert_eq!(ledger.get_passport("jti-2"), Some(record));
    assert_eq!(ledger.get_passport("no-such-jti"), None);
}

#[test]
fn key_ledger_tracks_status_transitions() {
    let ledger = InMemoryLedger::new();
    ledger.register_key(7, "Ed25519");
    assert_eq!(ledger.key_record(7).unwrap().status, KeyStatus::Active);

    ledger.set_key_status(7, KeyStatus::Retired).unwrap();
    assert_eq!(ledger.key_record(7).unwrap().status, KeyStatus::Retired);

    assert!(ledger.set_key_status(999, KeyStatus::Retired).is_err());
}

#[test]
fn audit_receipt_is_deterministic_for_identical_inputs() {
    let key = audit_key();
    let inputs = json!({"query": "select 1", "rows": 1});

    let r1 = audit_receipt(&key, "run-query", inputs.clone(), Some("lease-1"), "hash-a", Some(1000)).unwrap();
    let r2 = audit_receipt(&key, "run-query", inputs, Some("lease-1"), "hash-a", Some(1000)).unwrap();

    assert_eq!(r1, r2);
    assert!(verify_receipt(&key, &r1).unwrap());
}

#[test]
fn audit_tamper_evidence_catches_every_mutation() {
    let key = audit_key();
    let receipt = audit_receipt(
        &key,
        "run-query",
        json!({"query": "select 1"}),
        None,
        "hash-a",
        Some(42),
    )
    .unwrap();
    assert!(verify_receipt(&key, &receipt).unwrap());

    let mut tampered_payload = receipt.clone();
    tampered_payload.payload.result_hash = "hash-b".into();
    assert!(!verify_receipt(&key, &tampered_payload).unwrap());

    let mut tampered_digest = receipt.clone();
    tampered_digest.digest.push('0');
    assert!(!verify_receipt(&key, &tampered_digest).unwrap());

    let mut tampered_mac = receipt;
    tampered_mac.mac.push('0');
    assert!(!verify_receipt(&key, &tampered_mac).unwrap());
}

#[test]
fn recompute_matches_audit_receipt_output() {
    let key = audit_key();
    let receipt = audit_receipt(&key, "run-query", json!({"a": 1}), None, "hash", Some(5)).unwrap();
    let (digest, mac) = recompute(&key, &receipt.payload).unwrap();

    assert_eq!(digest, receipt.digest);
    assert_eq!(mac, receipt.mac);
}

#[test]
fn default_ts_bucket_is_current_minute() {
    let key = audit_key();
    let now_bucket = attest_types::time::Timestamp::now().0 / 60;

    let receipt = audit_receipt(&key, "run-query", json!({}), None, "hash", None).unwrap();
    assert_eq!(receipt.payload.ts_bucket, now_bucket);
}
