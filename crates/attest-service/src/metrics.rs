use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for C9 observability: passports issued, and verifications
/// broken down by outcome (valid/expired/revoked/tampered).
#[derive(Clone, Default)]
pub struct ServiceMetrics {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    passports_issued: AtomicU64,
    verify_valid: AtomicU64,
    verify_expired: AtomicU64,
    verify_revoked: AtomicU64,
    verify_tampered: AtomicU64,
}

/// Which bucket a `verify()` call lands in, mirroring the outcomes C9
/// requires counters for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    Expired,
    Revoked,
    Tampered,
}

impl ServiceMetrics {
    pub fn record_passport_issued(&self) {
        self.inner.passports_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verify(&self, outcome: VerifyOutcome) {
        let counter = match outcome {
            VerifyOutcome::Valid => &self.inner.verify_valid,
            VerifyOutcome::Expired => &self.inner.verify_expired,
            VerifyOutcome::Revoked => &self.inner.verify_revoked,
            VerifyOutcome::Tampered => &self.inner.verify_tampered,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ServiceMetricsSnapshot {
        ServiceMetricsSnapshot {
            passports_issued: self.inner.passports_issued.load(Ordering::Relaxed),
            verify_valid: self.inner.verify_valid.load(Ordering::Relaxed),
            verify_expired: self.inner.verify_expired.load(Ordering::Relaxed),
            verify_revoked: self.inner.verify_revoked.load(Ordering::Relaxed),
            verify_tampered: self.inner.verify_tampered.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceMetricsSnapshot {
    pub passports_issued: u64,
    pub verify_valid: u64,
    pub verify_expired: u64,
    pub verify_revoked: u64,
    pub verify_tampered: u64,
}
