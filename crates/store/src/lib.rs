//! Refresh-credential persistence for the Folio access core.
//!
//! This crate provides the [`CredentialStore`] trait and related types that
//! back refresh-credential durability. The session layer records a row per
//! issued refresh credential, rotates it in place on refresh, flags it as
//! revoked on logout, and a background sweep deletes rows whose expiry has
//! passed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Session flows                            │
//! │        (sign-up, login, refresh rotation, logout)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 folio-access-store                          │
//! │                CredentialStore trait                        │
//! │   (create, get_active_by_subject, get_by_token, update,     │
//! │    reap_expired)                                            │
//! ├───────────────────────┬─────────────────────────────────────┤
//! │ MemoryCredentialStore │        relational backend           │
//! │  (testing, reference) │       (host application)            │
//! └───────────────────────┴─────────────────────────────────────┘
//! ```
//!
//! # Credential Lifecycle
//!
//! ```text
//! ┌──────────┐  rotation   ┌──────────┐
//! │  Active  │────────────►│ Rotated  │ (same row, new value/expiry)
//! │          │             └──────────┘
//! │          │  logout     ┌──────────┐
//! │          │────────────►│ Revoked  │ (terminal, flag only)
//! │          │             └──────────┘
//! │          │  time       ┌──────────┐
//! │          │────────────►│ Expired  │ (terminal, deleted by sweep)
//! └──────────┘             └──────────┘
//! ```
//!
//! Revoked and expired rows are never reused; only the expiry sweep deletes
//! rows physically.
//!
//! # Quick Start
//!
//! ```
//! use chrono::{Duration, Utc};
//! use folio_access_store::{
//!     CredentialStore, MemoryCredentialStore, RefreshCredential, SubjectId,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryCredentialStore::new();
//!
//!     let credential = RefreshCredential::builder()
//!         .subject_id(42)
//!         .token("opaque-refresh-token".to_owned())
//!         .expires_at(Utc::now() + Duration::hours(72))
//!         .build();
//!
//!     let stored = store.create(credential).await?;
//!     let found = store.get_by_token("opaque-refresh-token").await?;
//!     assert_eq!(found.map(|c| c.id), Some(stored.id));
//!
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

/// Refresh-credential record type.
pub mod credential;
/// Store error types.
pub mod error;
/// Background expiry sweep.
pub mod reaper;
/// Persistence trait and in-memory reference implementation.
pub mod store;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
/// Identifier newtypes.
pub mod types;

pub use credential::RefreshCredential;
pub use error::{BoxError, StoreError, StoreResult};
pub use reaper::{DEFAULT_REAP_INTERVAL, spawn_expiry_reaper};
pub use store::{CredentialStore, MemoryCredentialStore};
pub use types::{CredentialId, SubjectId};
