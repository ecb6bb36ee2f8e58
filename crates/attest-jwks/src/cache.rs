use std::time::{Duration, Instant};

use attest_errors::code::codes;
use jsonwebtoken::jwk::JwkSet;
use tokio::sync::{Mutex, RwLock};

use crate::errors::JwksError;
use crate::metrics::{JwksMetrics, JwksMetricsSnapshot};

struct CacheState {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Process-wide cache of `{ keys, fetched_at, ttl }` for one JWKS
/// document. Fast path: a shared read of `now - fetched_at < ttl`
/// requires no write lock. Slow path: an exclusive refresh guard is
/// acquired, the cache is re-checked (another refresher may have already
/// won), and only then is the HTTP GET issued — classic double-checked
/// locking, so concurrent callers during a cold cache collapse into a
/// single upstream fetch.
pub struct JwksCache {
    url: String,
    ttl: Duration,
    http_timeout: Duration,
    client: reqwest::Client,
    state: RwLock<Option<CacheState>>,
    refresh_guard: Mutex<()>,
    metrics: JwksMetrics,
}

impl JwksCache {
    pub fn new(domain: impl Into<String>) -> Self {
        Self::with_settings(domain, Duration::from_secs(300), Duration::from_secs(10))
    }

    pub fn with_settings(domain: impl Into<String>, ttl: Duration, http_timeout: Duration) -> Self {
        let domain = domain.into();
        Self::from_url(
            format!("https://{domain}/.well-known/jwks.json"),
            ttl,
            http_timeout,
        )
    }

    /// Builds a cache against an explicit JWKS document URL, bypassing the
    /// conventional `https://{domain}/.well-known/jwks.json` layout. Used
    /// by deployments with a non-standard JWKS path and by tests pointing
    /// at a local mock server.
    pub fn from_url(url: impl Into<String>, ttl: Duration, http_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            ttl,
            http_timeout,
            client: reqwest::Client::new(),
            state: RwLock::new(None),
            refresh_guard: Mutex::new(()),
            metrics: JwksMetrics::default(),
        }
    }

    #[cfg(feature = "observe")]
    pub fn with_meter(mut self, meter: &dyn attest_observe::sdk::metrics::Meter) -> Self {
        self.metrics = JwksMetrics::with_meter(meter);
        self
    }

    pub fn metrics(&self) -> JwksMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Returns the cached `JwkSet`, refreshing it if the cache is cold or
    /// stale. Never panics on an upstream outage: if a non-empty stale
    /// cache exists, it is returned (with the caller expected to log a
    /// warning); only an empty cache on failure produces an error.
    pub async fn get_keys(&self) -> Result<JwkSet, JwksError> {
        if let Some(fresh) = self.fresh_cached().await {
            self.metrics.record_hit();
            return Ok(fresh);
        }

        let _permit = self.refresh_guard.lock().await;

        // Re-check: another refresher may have already won the race
        // while we waited for the guard.
        if let Some(fresh) = self.fresh_cached().await {
            self.metrics.record_hit();
            return Ok(fresh);
        }

        match self.fetch_remote().await {
            Ok(keys) => {
                let mut guard = self.state.write().await;
                *guard = Some(CacheState {
                    keys: keys.clone(),
                    fetched_at: Instant::now(),
                });
                drop(guard);
                self.metrics.record_miss();
                Ok(keys)
            }
            // A structurally invalid response is always an unconditional
            // failure: the cache is left untouched and no stale fallback
            // applies, even with a warm cache sitting right there. Only
            // network/HTTP failures against an otherwise-healthy upstream
            // are eligible for the stale-cache fallback below.
            Err(err) if err.0.code == codes::JWKS_MALFORMED => Err(err),
            Err(err) => {
                let guard = self.state.read().await;
                match guard.as_ref() {
                    Some(stale) if !stale.keys.keys.is_empty() => {
                        tracing::warn!(
                            url = %self.url,
                            error = %err,
                            "jwks refresh failed, serving stale cache",
                        );
                        let stale_keys = stale.keys.clone();
                        drop(guard);
                        self.metrics.record_stale_fallback();
                        Ok(stale_keys)
                    }
                    _ => Err(err),
                }
            }
        }
    }

    async fn fresh_cached(&self) -> Option<JwkSet> {
        let guard = self.state.read().await;
        let entry = guard.as_ref()?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.keys.clone())
        } else {
            None
        }
    }

    async fn fetch_remote(&self) -> Result<JwkSet, JwksError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.http_timeout)
            .send()
            .await
            .map_err(|e| JwksError::unavailable(&format!("jwks fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(JwksError::unavailable(&format!(
                "jwks endpoint returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JwksError::unavailable(&format!("jwks body read failed: {e}")))?;

        if body.get("keys").and_then(|v| v.as_array()).is_none() {
            return Err(JwksError::malformed("jwks response missing `keys` array"));
        }

        serde_json::from_value(body)
            .map_err(|e| JwksError::malformed(&format!("jwks response did not parse: {e}")))
    }

    /// Administrative/test operation: drops the cache unconditionally.
    pub async fn clear_cache(&self) {
        let mut guard = self.state.write().await;
        *guard = None;
    }

    /// Administrative/test operation: age of the cached entry, if any.
    pub async fn cache_age(&self) -> Option<Duration> {
        let guard = self.state.read().await;
        guard.as_ref().map(|entry| entry.fetched_at.elapsed())
    }
}
