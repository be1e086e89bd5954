//! Background sweep that deletes expired refresh-credential rows.
//!
//! Rotation and revocation never delete rows; this sweep is the only thing
//! that does. It runs on its own timer, fully decoupled from request
//! handling, and a failed tick is logged and retried on the next one rather
//! than crashing the process.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::store::CredentialStore;

/// Default interval between expiry sweeps (1 hour).
pub const DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(3_600);

/// Spawns the expiry sweep as a cancellable background task.
///
/// Every `interval` the task calls
/// [`reap_expired`](CredentialStore::reap_expired) with the current time and
/// logs the number of rows removed. The task stops when `cancel` is
/// cancelled, so the process can terminate cleanly in tests and in
/// production shutdown.
///
/// # Arguments
///
/// * `store` - The credential store to sweep
/// * `interval` - Time between sweeps (see [`DEFAULT_REAP_INTERVAL`])
/// * `cancel` - Token that stops the task when cancelled
///
/// # Panics
///
/// Must be called within a Tokio runtime context.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use folio_access_store::{
///     DEFAULT_REAP_INTERVAL, MemoryCredentialStore, spawn_expiry_reaper,
/// };
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() {
///     let store = Arc::new(MemoryCredentialStore::new());
///     let cancel = CancellationToken::new();
///
///     let handle = spawn_expiry_reaper(store, DEFAULT_REAP_INTERVAL, cancel.clone());
///
///     // ... serve traffic ...
///
///     cancel.cancel();
///     handle.await.unwrap();
/// }
/// ```
pub fn spawn_expiry_reaper(
    store: Arc<dyn CredentialStore>,
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
                    tracing::info!("expiry reaper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match store.reap_expired(Utc::now()).await {
                        Ok(reaped) => {
                            tracing::info!(reaped, "swept expired refresh credentials");
                        },
                        Err(err) => {
                            tracing::error!(
                                error = %err,
                                "failed to sweep expired refresh credentials, retrying next tick"
                            );
                        },
                    }
                }
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::{MemoryCredentialStore, RefreshCredential};

    fn expired_credential(token: &str) -> RefreshCredential {
        RefreshCredential::builder()
            .subject_id(1)
            .token(token.to_owned())
            .expires_at(Utc::now() - ChronoDuration::minutes(5))
            .build()
    }

    #[tokio::test]
    async fn test_reaper_removes_expired_rows() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.create(expired_credential("stale")).await.expect("create");

        let cancel = CancellationToken::new();
        let handle =
            spawn_expiry_reaper(store.clone(), Duration::from_millis(20), cancel.clone());

        tokio::time::sleep(Duration::from_millis(80)).await;
        cancel.cancel();
        handle.await.expect("task join");

        assert!(store.is_empty(), "expired row should have been swept");
    }

    #[tokio::test]
    async fn test_reaper_stops_on_cancellation() {
        let store = Arc::new(MemoryCredentialStore::new());
        let cancel = CancellationToken::new();

        let handle = spawn_expiry_reaper(store.clone(), Duration::from_millis(10), cancel.clone());

        cancel.cancel();
        handle.await.expect("task join");

        // Rows created after shutdown are never swept.
        store.create(expired_credential("post-shutdown")).await.expect("create");
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.len(), 1);
    }
}
