use std::collections::HashMap;

use parking_lot::Mutex;

use attest_types::time::Timestamp;

use crate::errors::LedgerError;
use crate::model::{KeyRecord, KeyStatus, PassportRecord, RevocationEntry};

/// Forensic write-once-per-`jti` record of every issuance.
pub trait PassportLedger: Send + Sync {
    fn record_passport(&self, record: PassportRecord) -> Result<(), LedgerError>;
    fn get_passport(&self, jti: &str) -> Option<PassportRecord>;
}

/// Revocation set consulted by every verification path before a result
/// is returned as `VALID`.
pub trait RevocationStore: Send + Sync {
    fn is_revoked(&self, jti: &str) -> bool;

    /// Idempotent: revoking an already-revoked `jti` leaves the original
    /// `revoked_at`/`reason`/`by_user` untouched and returns the existing
    /// entry.
    fn revoke(&self, jti: &str, reason: Option<String>, by_user: Option<String>) -> RevocationEntry;

    fn revocation_entry(&self, jti: &str) -> Option<RevocationEntry>;
}

/// Key-table bookkeeping: `kid -> (alg, status, created_at)`. Rotation and
/// lifecycle transitions live in `attest-crypto`'s `KeyTable`; this is the
/// durable forensic mirror of the same facts.
pub trait KeyLedger: Send + Sync {
    fn register_key(&self, kid: u64, alg: &str);
    fn set_key_status(&self, kid: u64, status: KeyStatus) -> Result<(), LedgerError>;
    fn key_record(&self, kid: u64) -> Option<KeyRecord>;
}

#[derive(Default)]
struct State {
    passports: HashMap<String, PassportRecord>,
    revocations: HashMap<String, RevocationEntry>,
    keys: HashMap<u64, KeyRecord>,
}

/// Process-local, lock-guarded reference implementation of the three
/// ledger traits. Satisfies the concurrency contract of a single
/// logical writer per `jti`, where a revocation that completes before a
/// verification is observed by that verification (same mutex guards both
/// reads and writes, so there is no window for a half-revoked state).
pub struct InMemoryLedger {
    state: Mutex<State>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PassportLedger for InMemoryLedger {
    fn record_passport(&self, record: PassportRecord) -> Result<(), LedgerError> {
        let mut guard = self.state.lock();
        guard.passports.insert(record.jti.clone(), record);
        Ok(())
    }

    fn get_passport(&self, jti: &str) -> Option<PassportRecord> {
        self.state.lock().passports.get(jti).cloned()
    }
}

impl RevocationStore for InMemoryLedger {
    fn is_revoked(&self, jti: &str) -> bool {
        self.state.lock().revocations.contains_key(jti)
    }

    fn revoke(&self, jti: &str, reason: Option<String>, by_user: Option<String>) -> RevocationEntry {
        let mut guard = self.state.lock();
        guard
            .revocations
            .entry(jti.to_string())
            .or_insert_with(|| RevocationEntry {
                jti: jti.to_string(),
                revoked_at: Timestamp::now().0,
                reason,
                by_user,
            })
            .clone()
    }

    fn revocation_entry(&self, jti: &str) -> Option<RevocationEntry> {
        self.state.lock().revocations.get(jti).cloned()
    }
}

impl KeyLedger for InMemoryLedger {
    fn register_key(&self, kid: u64, alg: &str) {
        let mut guard = self.state.lock();
        guard.keys.entry(kid).or_insert_with(|| KeyRecord {
            kid,
            alg: alg.to_string(),
            status: KeyStatus::Active,
            created_at: Timestamp::now().0,
        });
    }

    fn set_key_status(&self, kid: u64, status: KeyStatus) -> Result<(), LedgerError> {
        let mut guard = self.state.lock();
        let record = guard
            .keys
            .get_mut(&kid)
            .ok_or_else(|| LedgerError::not_found(&format!("kid {kid} not registered")))?;
        record.status = status;
        Ok(())
    }

    fn key_record(&self, kid: u64) -> Option<KeyRecord> {
        self.state.lock().keys.get(&kid).cloned()
    }
}
