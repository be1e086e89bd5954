//! Per-client admission control for the Folio access core.
//!
//! This crate provides [`FixedWindowLimiter`], a coarse abuse shield that
//! sits in front of all requests. Each client (keyed by source address)
//! gets a counter and a "last seen" timestamp; a request is rejected when
//! the post-increment count within the current 1-second window exceeds the
//! configured limit.
//!
//! This is intentionally coarse (a fixed window, not a sliding window or
//! token bucket) because its purpose is abuse protection, not fairness
//! guarantees.
//!
//! # Memory Bound
//!
//! A background eviction task drops keys unseen for over a minute, bounding
//! memory under churn from many distinct clients. The task takes the same
//! lock as the request path and is cancellable for clean shutdown.
//!
//! # Example
//!
//! ```
//! use folio_access_admission::{AdmissionConfig, FixedWindowLimiter};
//!
//! let limiter = FixedWindowLimiter::new(AdmissionConfig::builder().limit(100).build());
//!
//! // Requests are admitted until the per-window limit is exceeded.
//! assert!(limiter.check("203.0.113.7").is_ok());
//! ```

#![deny(unsafe_code)]

/// Admission error types.
pub mod error;
/// Fixed-window limiter and its eviction sweep.
pub mod limiter;

pub use error::AdmissionError;
pub use limiter::{
    AdmissionConfig, AdmissionMetricsSnapshot, DEFAULT_EVICTION_INTERVAL, DEFAULT_IDLE_TIMEOUT,
    DEFAULT_WINDOW, FixedWindowLimiter, spawn_idle_eviction,
};
