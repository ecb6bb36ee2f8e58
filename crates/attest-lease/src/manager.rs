use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rand::RngCore;

use crate::metrics::{LeaseMetrics, LeaseMetricsSnapshot};
use crate::model::LeaseRecord;

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}

fn random_lease_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Outcome of a `validate` call, detailed enough for the service facade
/// to pick the right `LEASE_INVALID` / `SCOPE_INSUFFICIENT` reason string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidateOutcome {
    Valid,
    NotFound,
    Expired,
    ScopeMismatch,
    AlreadyUsed,
}

impl ValidateOutcome {
    pub fn is_valid(self) -> bool {
        matches!(self, ValidateOutcome::Valid)
    }
}

struct UsedEntry {
    /// Retained until `exp + grace`: membership here is swept once the
    /// lease could no longer plausibly replay under clock skew, rather
    /// than growing the used-set without bound.
    retain_until: i64,
}

struct State {
    active: HashMap<String, LeaseRecord>,
    used: HashMap<String, UsedEntry>,
}

/// Issues single-use leases and enforces at-most-once consumption under
/// concurrent access. Active store and used-set share one lock: the
/// ordering guarantee ("exactly one `consume` wins globally", "no
/// half-revoked observation") falls out trivially from a single
/// exclusive critical section around check-and-insert, rather than
/// needing careful two-lock choreography.
pub struct LeaseManager {
    state: Mutex<State>,
    grace_s: i64,
    metrics: LeaseMetrics,
}

impl LeaseManager {
    pub fn new(grace_s: i64) -> Self {
        Self::with_metrics(grace_s, LeaseMetrics::default())
    }

    pub fn with_metrics(grace_s: i64, metrics: LeaseMetrics) -> Self {
        Self {
            state: Mutex::new(State {
                active: HashMap::new(),
                used: HashMap::new(),
            }),
            grace_s: grace_s.max(0),
            metrics,
        }
    }

    pub fn metrics(&self) -> LeaseMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn issue(&self, user_id: &str, action_id: &str, scope: &str, ttl_s: i64) -> LeaseRecord {
        let issued_at = now_unix();
        let exp = issued_at + ttl_s.max(0);
        let record = LeaseRecord {
            lease_id: random_lease_id(),
            user_id: user_id.to_string(),
            action_id: action_id.to_string(),
            scope: scope.to_string(),
            issued_at,
            exp,
            used: false,
        };

        let mut guard = self.state.lock();
        guard.active.insert(record.lease_id.clone(), record.clone());
        drop(guard);
        self.metrics.record_issued();
        record
    }

    /// Read-only lookup; never affects the used-set.
    pub fn lease_status(&self, lease_id: &str) -> Option<LeaseRecord> {
        self.state.lock().active.get(lease_id).cloned()
    }

    pub fn active_count(&self) -> usize {
        self.state.lock().active.len()
    }

    /// `true` iff the lease exists, is unexpired, `needed_scope` matches,
    /// and (if `consume`) the lease has not already been consumed or
    /// revoked. A wrong-scope call never consumes, so callers may retry
    /// with the correct scope.
    pub fn validate(&self, lease_id: &str, needed_scope: &str, consume: bool) -> ValidateOutcome {
        let now = now_unix();
        let mut guard = self.state.lock();

        if guard.used.contains_key(lease_id) {
            return ValidateOutcome::AlreadyUsed;
        }

        let record = match guard.active.get(lease_id) {
            Some(r) => r.clone(),
            None => return ValidateOutcome::NotFound,
        };

        if record.is_expired(now) {
            return ValidateOutcome::Expired;
        }
        if record.scope != needed_scope {
            return ValidateOutcome::ScopeMismatch;
        }

        if consume {
            guard.used.insert(
                lease_id.to_string(),
                UsedEntry {
                    retain_until: record.exp + self.grace_s,
                },
            );
            if let Some(active) = guard.active.get_mut(lease_id) {
                active.used = true;
            }
            drop(guard);
            self.metrics.record_consumed();
        }

        ValidateOutcome::Valid
    }

    /// Idempotent: revoking an already-revoked or already-consumed lease
    /// leaves the same observable state (present in the used-set, absent
    /// from the active store).
    pub fn revoke(&self, lease_id: &str) -> bool {
        let now = now_unix();
        let mut guard = self.state.lock();
        let removed = guard.active.remove(lease_id);
        let existed = removed.is_some();
        let retain_until = removed.map(|r| r.exp).unwrap_or(now) + self.grace_s;
        guard
            .used
            .entry(lease_id.to_string())
            .or_insert(UsedEntry { retain_until });
        existed
    }

    /// Removes expired active entries and used-set entries past their
    /// retention window. Restartable: running it twice in a row with no
    /// intervening activity is a no-op the second time.
    pub fn sweep(&self) -> usize {
        let now = now_unix();
        let mut guard = self.state.lock();
        let before = guard.active.len();
        guard.active.retain(|_, record| !record.is_expired(now));
        guard.used.retain(|_, entry| entry.retain_until >= now);
        let removed = before - guard.active.len();
        drop(guard);
        self.metrics.record_expired(removed as u64);
        removed
    }
}

impl Default for LeaseManager {
    fn default() -> Self {
        // Grace must be >= max expected clock skew; 30s covers typical
        // NTP drift between cooperating nodes.
        Self::new(30)
    }
}
