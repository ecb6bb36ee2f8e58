use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(feature = "observe")]
use attest_observe::model::{MetricKind, MetricSpec};
#[cfg(feature = "observe")]
use attest_observe::sdk::metrics::{CounterHandle, Meter};

#[cfg(feature = "observe")]
pub mod spec {
    use attest_observe::model::{MetricKind, MetricSpec};

    pub const CACHE_HIT_TOTAL: MetricSpec = MetricSpec {
        name: "attest_jwks_cache_hit_total",
        kind: MetricKind::Counter,
        help: "Count of get_keys() calls served from an unexpired cache entry.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const CACHE_MISS_TOTAL: MetricSpec = MetricSpec {
        name: "attest_jwks_cache_miss_total",
        kind: MetricKind::Counter,
        help: "Count of get_keys() calls that triggered a successful upstream refresh.",
        buckets_ms: None,
        stable_labels: &[],
    };

    pub const CACHE_STALE_FALLBACK_TOTAL: MetricSpec = MetricSpec {
        name: "attest_jwks_cache_stale_fallback_total",
        kind: MetricKind::Counter,
        help: "Count of get_keys() calls served from a stale cache after an upstream failure.",
        buckets_ms: None,
        stable_labels: &[],
    };
}

#[cfg(feature = "observe")]
#[derive(Clone)]
struct ObservedHandles {
    hit: CounterHandle,
    miss: CounterHandle,
    stale_fallback: CounterHandle,
}

#[cfg(feature = "observe")]
impl ObservedHandles {
    fn new(meter: &dyn Meter) -> Self {
        Self {
            hit: meter.counter(&spec::CACHE_HIT_TOTAL),
            miss: meter.counter(&spec::CACHE_MISS_TOTAL),
            stale_fallback: meter.counter(&spec::CACHE_STALE_FALLBACK_TOTAL),
        }
    }
}

/// Counters for C9 observability: JWKS cache hits/misses/stale-fallbacks.
#[derive(Clone)]
pub struct JwksMetrics {
    inner: Arc<Inner>,
    #[cfg(feature = "observe")]
    observed: Option<ObservedHandles>,
}

#[derive(Default)]
struct Inner {
    hit: AtomicU64,
    miss: AtomicU64,
    stale_fallback: AtomicU64,
}

impl Default for JwksMetrics {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            #[cfg(feature = "observe")]
            observed: None,
        }
    }
}

impl JwksMetrics {
    #[cfg(feature = "observe")]
    pub fn with_meter(meter: &dyn Meter) -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            observed: Some(ObservedHandles::new(meter)),
        }
    }

    pub fn record_hit(&self) {
        self.inner.hit.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.hit.inc(1);
        }
    }

    pub fn record_miss(&self) {
        self.inner.miss.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.miss.inc(1);
        }
    }

    pub fn record_stale_fallback(&self) {
        self.inner.stale_fallback.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observe")]
        if let Some(obs) = &self.observed {
            obs.stale_fallback.inc(1);
        }
    }

    pub fn snapshot(&self) -> JwksMetricsSnapshot {
        JwksMetricsSnapshot {
            hit: self.inner.hit.load(Ordering::Relaxed),
            miss: self.inner.miss.load(Ordering::Relaxed),
            stale_fallback: self.inner.stale_fallback.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JwksMetricsSnapshot {
    pub hit: u64,
    pub miss: u64,
    pub stale_fallback: u64,
}
