use std::sync::Arc;
use std::thread;

use attest_lease::prelude::*;

#[test]
fn replay_defense_second_validate_fails() {
    let mgr = LeaseManager::default();
    let lease = mgr.issue("u", "a", "tool:x", 30);

    assert!(mgr.validate(&lease.lease_id, "tool:x", true).is_valid());
    assert!(!mgr.validate(&lease.lease_id, "tool:x", true).is_valid());
}

#[test]
fn wrong_scope_does_not_consume() {
    let mgr = LeaseManager::default();
    let lease = mgr.issue("u", "a", "tool:x", 30);

    assert_eq!(
        mgr.validate(&lease.lease_id, "tool:y", true),
        ValidateOutcome::ScopeMismatch
    );
    assert!(mgr.validate(&lease.lease_id, "tool:x", true).is_valid());
}

#[test]
fn zero_ttl_expires_immediately() {
    let mgr = LeaseManager::default();
    let lease = mgr.issue("u", "a", "tool:x", 0);
    assert_eq!(
        mgr.validate(&lease.lease_id, "tool:x", true),
        ValidateOutcome::Expired
    );
}

#[test]
fn unknown_lease_id_is_not_found() {
    let mgr = LeaseManager::default();
    assert_eq!(
        mgr.validate("does-not-exist", "tool:x", true),
        ValidateOutcome::NotFound
    );
}

#[test]
fn revoke_is_idempotent_and_blocks_validation() {
    let mgr = LeaseManager::default();
    let lease = mgr.issue("u", "a", "tool:x", 30);

    assert!(mgr.revoke(&lease.lease_id));
    assert!(!mgr.revoke(&lease.lease_id));
    assert_eq!(
        mgr.validate(&lease.lease_id, "tool:x", true),
        ValidateOutcome::AlreadyUsed
    );
}

#[test]
fn sweep_removes_only_expired_active_entries() {
    let mgr = LeaseManager::default();
    let expired = mgr.issue("u", "a", "tool:x", 0);
    let live = mgr.issue("u", "a", "tool:y", 300);

    let removed = mgr.sweep();
    assert_eq!(removed, 1);
    assert!(mgr.lease_status(&expired.lease_id).is_none());
    assert!(mgr.lease_status(&live.lease_id).is_some());
}

#[test]
fn lease_status_lookup_does_not_consume() {
    let mgr = LeaseManager::default();
    let lease = mgr.issue("u", "a", "tool:x", 30);

    let status = mgr.lease_status(&lease.lease_id).unwrap();
    assert!(!status.used);
    assert!(mgr.validate(&lease.lease_id, "tool:x", true).is_valid());
}

#[test]
fn metrics_snapshot_tracks_issued_consumed_and_expired() {
    let mgr = LeaseManager::default();
    let live = mgr.issue("u", "a", "tool:x", 300);
    let expired = mgr.issue("u", "a", "tool:y", 0);

    assert!(mgr.validate(&live.lease_id, "tool:x", true).is_valid());
    mgr.sweep();

    let snapshot = mgr.metrics();
    assert_eq!(snapshot.issued, 2);
    assert_eq!(snapshot.consumed, 1);
    assert_eq!(snapshot.expired, 1);
    let _ = &expired;
}

#[test]
fn concurrent_consume_exactly_one_winner() {
    let mgr = Arc::new(LeaseManager::default());
    let lease = mgr.issue("u", "a", "tool:x", 30);
    let lease_id = lease.lease_id.clone();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let mgr = mgr.clone();
            let lease_id = lease_id.clone();
            thread::spawn(move || mgr.validate(&lease_id, "tool:x", true).is_valid())
        })
        .collect();

    let wins: usize = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&ok| ok)
        .count();

    assert_eq!(wins, 1);
}
