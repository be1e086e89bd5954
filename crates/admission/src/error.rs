//! Admission error types.

use std::time::Duration;

use thiserror::Error;

/// Rejection by the admission controller.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdmissionError {
    /// The client exceeded its per-window request limit.
    ///
    /// The request must not be forwarded. `retry_after` is the idle time
    /// after which the window resets.
    #[error("Too many requests (retry after {}ms)", retry_after.as_millis())]
    Throttled {
        /// Idle time after which the client's window resets.
        retry_after: Duration,
    },
}

impl AdmissionError {
    /// Creates a new `Throttled` error with the given retry hint.
    #[must_use]
    pub fn throttled(retry_after: Duration) -> Self {
        Self::Throttled { retry_after }
    }
}
