use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(feature = "observe")]
use attest_observe::model::{MetricKind, MetricSpec};
#[cfg(feature = "observe")]
use attest_observe::sdk::metrics::{CounterHandle, Meter};

#[cfg(feature = "observe")]
pub mod spec {
    use attest_observe::model::{MetricKind, MetricSpec};

    pub const LEASES_ISSUED_TOTAL: MetricSpec = MetricSpec {
        name: "attest_lease_issued_total",
        kind: MetricKind::Counter,
        help: "Count of capability leases issued.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const LEASES_CONSUMED_TOTAL: MetricSpec = MetricSpec {
        name: "attest_lease_consumed_total",
        kind: MetricKind::Counter,
        help: "Count of leases consumed by a winning validate(consume=true) call.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const LEASES_EXPIRED_TOTAL: MetricSpec = MetricSpec {
        name: "attest_lease_expired_total",
        kind: MetricKind::Counter,
        help: "Count of active leases removed by sweep() for having passed exp.",
        buckets_ms: None,
        stable_labels: &[],
    };
}

#[cfg(feature = "observe")]
#[derive(Clone)]
struct ObservedHandles {
    issued: CounterHandle,
    consumed: CounterHandle,
    expired: CounterHandle,
}

#[cfg(feature = "observe")]
impl ObservedHandles {
    fn new(meter: &dyn Meter) -> Self {
        Self {
            issued: meter.counter(&spec::LEASES_ISSUED_TOTAL),
            consumed: meter.counter(&spec::LEASES_CONSUMED_TOTAL),
            expired: meter.counter(&spec::LEASES_EXPIRED_TOTAL),
        }
    }
}

/// Counters for C9 observability: leases issued/consumed/expired. Kept as
/// plain atomics regardless of the `observe` feature so `snapshot()` is
/// always available to a caller with no external metrics backend wired.
#[derive(Clone)]
pub struct LeaseMetrics {
    inner: Arc<Inner>,
    #[cfg(feature = "observe")]
    observed: Option<ObservedHandles>,
}

#[derive(Default)]
struct Inner {
    issued: AtomicU64,
    consumed: AtomicU64,
    expired: AtomicU64,
}

impl Default for LeaseMetrics {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            #[cfg(feature = "observe")]
            observed: None,
        }
    }
}

impl LeaseMetrics {
    #[cfg(feature = "observe")]
    pub fn with_meter(meter: &dyn Meter) -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            observed: Some(ObservedHandles::new(meter)),
        }
    }

    pub fn record_issued(&self) {
        self.inner.issued.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.issued.inc(1);
        }
    }

    pub fn record_consumed(&self) {
        self.inner.consumed.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.consumed.inc(1);
        }
    }

    pub fn record_expired(&self, count: u64) {
        if count == 0 {
            return;
        }
        self.inner.expired.fetch_add(count, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.expired.inc(count);
        }
    }

    pub fn snapshot(&self) -> LeaseMetricsSnapshot {
        LeaseMetricsSnapshot {
            issued: self.inner.issued.load(Ordering::Relaxed),
            consumed: self.inner.consumed.load(Ordering::Relaxed),
            expired: self.inner.expired.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaseMetricsSnapshot {
    pub issued: u64,
    pub consumed: u64,
    pub expired: u64,
}
