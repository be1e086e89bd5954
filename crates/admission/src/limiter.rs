//! Fixed-window limiter and its eviction sweep.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::AdmissionError;

/// Default counting window (1 second).
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

/// Default idle time after which a client's entry is evicted (1 minute).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default interval between eviction sweeps (1 minute).
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the fixed-window limiter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdmissionConfig {
    /// Maximum requests admitted per client per window.
    limit: u32,

    /// Counting window.
    #[serde(with = "humantime_serde", default = "default_window")]
    window: Duration,

    /// Idle time after which a client's entry is evicted.
    #[serde(with = "humantime_serde", default = "default_idle_timeout")]
    idle_timeout: Duration,
}

fn default_window() -> Duration {
    DEFAULT_WINDOW
}

fn default_idle_timeout() -> Duration {
    DEFAULT_IDLE_TIMEOUT
}

#[bon::bon]
impl AdmissionConfig {
    /// Creates a new admission configuration.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum requests per client per window (must be >= 1)
    ///
    /// # Optional Fields
    ///
    /// * `window` - Counting window (default: 1 second).
    /// * `idle_timeout` - Eviction threshold (default: 1 minute). Must not be shorter than the
    ///   window, or live windows would be evicted mid-count.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero or `idle_timeout < window`.
    #[builder]
    pub fn new(
        limit: u32,
        #[builder(default = DEFAULT_WINDOW)] window: Duration,
        #[builder(default = DEFAULT_IDLE_TIMEOUT)] idle_timeout: Duration,
    ) -> Self {
        assert!(limit >= 1, "limit must be at least 1");
        assert!(idle_timeout >= window, "idle_timeout must not be shorter than the window");
        Self { limit, window, idle_timeout }
    }

    /// Returns the per-window request limit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the counting window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns the eviction threshold.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
}

/// Per-client window state.
#[derive(Debug)]
struct ClientWindow {
    count: u32,
    last_seen: Instant,
}

/// Counters tracked by the limiter.
#[derive(Debug, Default)]
struct AdmissionMetrics {
    admitted: AtomicU64,
    throttled: AtomicU64,
}

/// Snapshot of the limiter counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmissionMetricsSnapshot {
    /// Total requests admitted.
    pub admitted: u64,
    /// Total requests rejected.
    pub throttled: u64,
}

/// Per-client fixed-window admission limiter.
///
/// Shared mutable state across all request workers; the per-key counter map
/// is guarded by a single [`parking_lot::Mutex`], and the eviction sweep
/// takes the same lock for its duration.
///
/// # Window Semantics
///
/// `last_seen` advances on every request, admitted or not. The counter
/// resets only once the client has been idle for a full window, so a
/// client flooding continuously stays rejected until it backs off.
pub struct FixedWindowLimiter {
    clients: Mutex<HashMap<String, ClientWindow>>,
    config: AdmissionConfig,
    metrics: AdmissionMetrics,
}

impl std::fmt::Debug for FixedWindowLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FixedWindowLimiter {
    /// Creates a limiter with the given configuration.
    #[must_use]
    pub fn new(config: AdmissionConfig) -> Self {
        Self { clients: Mutex::new(HashMap::new()), config, metrics: AdmissionMetrics::default() }
    }

    /// Admits or rejects one request from the given client key.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Throttled`] when the post-increment count
    /// for the current window exceeds the limit. The request must not be
    /// forwarded.
    pub fn check(&self, client: &str) -> Result<(), AdmissionError> {
        let now = Instant::now();
        let mut clients = self.clients.lock();

        let window = clients
            .entry(client.to_owned())
            .or_insert_with(|| ClientWindow { count: 0, last_seen: now });

        if now.duration_since(window.last_seen) > self.config.window {
            window.count = 0;
        }

        window.count += 1;
        window.last_seen = now;

        if window.count > self.config.limit {
            drop(clients);
            self.metrics.throttled.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(client, "request throttled");
            return Err(AdmissionError::throttled(self.config.window));
        }

        drop(clients);
        self.metrics.admitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Removes entries idle past the configured timeout and returns how
    /// many were dropped.
    ///
    /// Runs under the same lock as [`check`](Self::check); normally invoked
    /// by the background sweep (see [`spawn_idle_eviction`]).
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut clients = self.clients.lock();
        let before = clients.len();
        clients
            .retain(|_, window| now.duration_since(window.last_seen) <= self.config.idle_timeout);
        before - clients.len()
    }

    /// Returns the number of client entries currently tracked.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }

    /// Returns a snapshot of the admitted/throttled counters.
    #[must_use]
    pub fn metrics_snapshot(&self) -> AdmissionMetricsSnapshot {
        AdmissionMetricsSnapshot {
            admitted: self.metrics.admitted.load(Ordering::Relaxed),
            throttled: self.metrics.throttled.load(Ordering::Relaxed),
        }
    }

    #[cfg(test)]
    fn backdate(&self, client: &str, by: Duration) {
        let mut clients = self.clients.lock();
        if let Some(window) = clients.get_mut(client) {
            window.last_seen -= by;
        }
    }
}

/// Spawns the idle-entry eviction sweep as a cancellable background task.
///
/// Every `interval` the task evicts entries idle past the configured
/// timeout. The task stops when `cancel` is cancelled.
///
/// # Panics
///
/// Must be called within a Tokio runtime context.
pub fn spawn_idle_eviction(
    limiter: Arc<FixedWindowLimiter>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; consume it so we start with a
        // full interval wait.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("admission eviction sweep shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let evicted = limiter.evict_idle();
                    if evicted > 0 {
                        tracing::debug!(evicted, "evicted idle admission entries");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn limiter(limit: u32) -> FixedWindowLimiter {
        FixedWindowLimiter::new(AdmissionConfig::builder().limit(limit).build())
    }

    #[test]
    #[should_panic(expected = "limit must be at least 1")]
    fn config_rejects_zero_limit() {
        let _ = AdmissionConfig::builder().limit(0).build();
    }

    #[test]
    #[should_panic(expected = "idle_timeout must not be shorter than the window")]
    fn config_rejects_idle_timeout_below_window() {
        let _ = AdmissionConfig::builder()
            .limit(10)
            .window(Duration::from_secs(2))
            .idle_timeout(Duration::from_secs(1))
            .build();
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: AdmissionConfig = serde_json::from_str(r#"{"limit": 100}"#).unwrap();
        assert_eq!(config.limit(), 100);
        assert_eq!(config.window(), DEFAULT_WINDOW);
        assert_eq!(config.idle_timeout(), DEFAULT_IDLE_TIMEOUT);
    }

    #[test]
    fn hundred_first_request_in_window_rejected() {
        let limiter = limiter(100);

        for i in 0..100 {
            assert!(limiter.check("203.0.113.7").is_ok(), "request {i} should be admitted");
        }

        let result = limiter.check("203.0.113.7");
        assert!(
            matches!(result, Err(AdmissionError::Throttled { .. })),
            "the 101st request in one window must be rejected"
        );
    }

    #[test]
    fn first_request_of_next_window_admitted() {
        let limiter = limiter(100);

        for _ in 0..101 {
            let _ = limiter.check("203.0.113.7");
        }

        // Simulate the client staying idle past the window.
        limiter.backdate("203.0.113.7", DEFAULT_WINDOW + Duration::from_millis(10));

        assert!(
            limiter.check("203.0.113.7").is_ok(),
            "the first request of the next window must be admitted"
        );
    }

    #[test]
    fn continuous_flood_never_resets() {
        let limiter = limiter(2);

        let _ = limiter.check("client");
        let _ = limiter.check("client");

        // Every further attempt refreshes last_seen, so the window never
        // elapses while the flood continues.
        for _ in 0..10 {
            assert!(limiter.check("client").is_err());
        }
    }

    #[test]
    fn clients_are_counted_independently() {
        let limiter = limiter(1);

        assert!(limiter.check("client-a").is_ok());
        assert!(limiter.check("client-a").is_err());

        assert!(limiter.check("client-b").is_ok(), "a different client has its own window");
    }

    #[test]
    fn throttled_error_carries_retry_hint() {
        let limiter = limiter(1);
        let _ = limiter.check("client");

        match limiter.check("client") {
            Err(AdmissionError::Throttled { retry_after }) => {
                assert_eq!(retry_after, DEFAULT_WINDOW);
            },
            other => panic!("expected Throttled, got {other:?}"),
        }
    }

    #[test]
    fn eviction_drops_only_idle_entries() {
        let limiter = limiter(100);

        let _ = limiter.check("idle-client");
        let _ = limiter.check("live-client");
        assert_eq!(limiter.tracked_clients(), 2);

        limiter.backdate("idle-client", DEFAULT_IDLE_TIMEOUT + Duration::from_secs(1));

        let evicted = limiter.evict_idle();
        assert_eq!(evicted, 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn evicted_client_starts_a_fresh_window() {
        let limiter = limiter(1);

        let _ = limiter.check("client");
        assert!(limiter.check("client").is_err());

        limiter.backdate("client", DEFAULT_IDLE_TIMEOUT + Duration::from_secs(1));
        limiter.evict_idle();

        assert!(limiter.check("client").is_ok(), "an evicted key is a brand-new client");
    }

    #[test]
    fn metrics_track_admitted_and_throttled() {
        let limiter = limiter(2);

        let _ = limiter.check("client");
        let _ = limiter.check("client");
        let _ = limiter.check("client");

        let snapshot = limiter.metrics_snapshot();
        assert_eq!(snapshot.admitted, 2);
        assert_eq!(snapshot.throttled, 1);
    }

    #[test]
    fn concurrent_checks_admit_exactly_the_limit() {
        let limiter = Arc::new(limiter(50));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(std::thread::spawn(move || {
                let mut admitted = 0;
                for _ in 0..25 {
                    if limiter.check("shared-client").is_ok() {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let admitted: u32 = handles.into_iter().map(|h| h.join().expect("join")).sum();
        assert_eq!(admitted, 50, "exactly the limit is admitted under contention");
    }

    #[tokio::test]
    async fn eviction_sweep_runs_and_stops_on_cancel() {
        let limiter = Arc::new(limiter(100));
        let _ = limiter.check("idle-client");
        limiter.backdate("idle-client", DEFAULT_IDLE_TIMEOUT + Duration::from_secs(1));

        let cancel = CancellationToken::new();
        let handle =
            spawn_idle_eviction(Arc::clone(&limiter), Duration::from_millis(20), cancel.clone());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(limiter.tracked_clients(), 0, "sweep should have evicted the idle entry");

        cancel.cancel();
        handle.await.expect("task join");
    }
}
