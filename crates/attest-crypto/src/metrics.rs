use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(feature = "observe")]
use attest_observe::model::{MetricKind, MetricSpec};
#[cfg(feature = "observe")]
use attest_observe::sdk::metrics::{CounterHandle, Meter};

#[cfg(feature = "observe")]
pub mod spec {
    use attest_observe::model::{MetricKind, MetricSpec};

    pub const CANONICAL_OK_TOTAL: MetricSpec = MetricSpec {
        name: "attest_crypto_canonical_ok_total",
        kind: MetricKind::Counter,
        help: "Count of successful canonicalization operations.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const CANONICAL_ERR_TOTAL: MetricSpec = MetricSpec {
        name: "attest_crypto_canonical_err_total",
        kind: MetricKind::Counter,
        help: "Count of failed canonicalization operations.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const DIGEST_OK_TOTAL: MetricSpec = MetricSpec {
        name: "attest_crypto_digest_ok_total",
        kind: MetricKind::Counter,
        help: "Count of successful digest operations.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const DIGEST_ERR_TOTAL: MetricSpec = MetricSpec {
        name: "attest_crypto_digest_err_total",
        kind: MetricKind::Counter,
        help: "Count of failed digest operations.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const SIGN_OK_TOTAL: MetricSpec = MetricSpec {
        name: "attest_crypto_sign_ok_total",
        kind: MetricKind::Counter,
        help: "Count of successful signing operations.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const SIGN_ERR_TOTAL: MetricSpec = MetricSpec {
        name: "attest_crypto_sign_err_total",
        kind: MetricKind::Counter,
        help: "Count of failed signing operations.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const COMMIT_OK_TOTAL: MetricSpec = MetricSpec {
        name: "attest_crypto_commit_ok_total",
        kind: MetricKind::Counter,
        help: "Count of successful HMAC commitment operations.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const COMMIT_ERR_TOTAL: MetricSpec = MetricSpec {
        name: "attest_crypto_commit_err_total",
        kind: MetricKind::Counter,
        help: "Count of failed HMAC commitment operations.",
        buckets_ms: None,
        stable_labels: &[],
    };
}

#[cfg(feature = "observe")]
#[derive(Clone)]
struct ObservedHandles {
    canonical_ok: CounterHandle,
    canonical_err: CounterHandle,
    digest_ok: CounterHandle,
    digest_err: CounterHandle,
    sign_ok: CounterHandle,
    sign_err: CounterHandle,
    commit_ok: CounterHandle,
    commit_err: CounterHandle,
}

#[cfg(feature = "observe")]
impl ObservedHandles {
    fn new(meter: &dyn Meter) -> Self {
        Self {
            canonical_ok: meter.counter(&spec::CANONICAL_OK_TOTAL),
            canonical_err: meter.counter(&spec::CANONICAL_ERR_TOTAL),
            digest_ok: meter.counter(&spec::DIGEST_OK_TOTAL),
            digest_err: meter.counter(&spec::DIGEST_ERR_TOTAL),
            sign_ok: meter.counter(&spec::SIGN_OK_TOTAL),
            sign_err: meter.counter(&spec::SIGN_ERR_TOTAL),
            commit_ok: meter.counter(&spec::COMMIT_OK_TOTAL),
            commit_err: meter.counter(&spec::COMMIT_ERR_TOTAL),
        }
    }
}

#[derive(Clone)]
pub struct CryptoMetrics {
    inner: Arc<Inner>,
    #[cfg(feature = "observe")]
    observed: Option<ObservedHandles>,
}

#[derive(Default)]
struct Inner {
    canonical_ok: AtomicU64,
    canonical_err: AtomicU64,
    digest_ok: AtomicU64,
    digest_err: AtomicU64,
    sign_ok: AtomicU64,
    sign_err: AtomicU64,
    commit_ok: AtomicU64,
    commit_err: AtomicU64,
}

impl Default for CryptoMetrics {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            #[cfg(feature = "observe")]
            observed: None,
        }
    }
}

impl CryptoMetrics {
    #[cfg(feature = "observe")]
    pub fn with_meter(meter: &dyn Meter) -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            observed: Some(ObservedHandles::new(meter)),
        }
    }

    pub fn record_canonical_ok(&self) {
        self.inner.canonical_ok.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.canonical_ok.inc(1);
        }
    }

    pub fn record_canonical_err(&self) {
        self.inner.canonical_err.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.canonical_err.inc(1);
        }
    }

    pub fn record_digest_ok(&self) {
        self.inner.digest_ok.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.digest_ok.inc(1);
        }
    }

    pub fn record_digest_err(&self) {
        self.inner.digest_err.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.digest_err.inc(1);
        }
    }

    pub fn record_sign_ok(&self) {
        self.inner.sign_ok.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.sign_ok.inc(1);
        }
    }

    pub fn record_sign_err(&self) {
        self.inner.sign_err.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.sign_err.inc(1);
        }
    }

    pub fn record_commit_ok(&self) {
        self.inner.commit_ok.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.commit_ok.inc(1);
        }
    }

    pub fn record_commit_err(&self) {
        self.inner.commit_err.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.commit_err.inc(1);
        }
    }

    pub fn snapshot(&self) -> CryptoMetricsSnapshot {
        CryptoMetricsSnapshot {
            canonical_ok: self.inner.canonical_ok.load(Ordering::Relaxed),
            canonical_err: self.inner.canonical_err.load(Ordering::Relaxed),
            digest_ok: self.inner.digest_ok.load(Ordering::Relaxed),
            digest_err: self.inner.digest_err.load(Ordering::Relaxed),
            sign_ok: self.inner.sign_ok.load(Ordering::Relaxed),
            sign_err: self.inner.sign_err.load(Ordering::Relaxed),
            commit_ok: self.inner.commit_ok.load(Ordering::Relaxed),
            commit_err: self.inner.commit_err.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CryptoMetricsSnapshot {
    pub canonical_ok: u64,
    pub canonical_err: u64,
    pub digest_ok: u64,
    pub digest_err: u64,
    pub sign_ok: u64,
    pub sign_err: u64,
    pub commit_ok: u64,
    pub commit_err: u64,
}
