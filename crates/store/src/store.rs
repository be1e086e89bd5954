//! Persistence trait for refresh-credential lifecycle operations.
//!
//! This module provides the [`CredentialStore`] trait that abstracts
//! persistence for refresh credentials. Implementations can use different
//! backends (the host's relational engine for production, in-memory for
//! testing).
//!
//! # Concurrency
//!
//! Implementations must be safe under concurrent invocation from many
//! request workers. Consistency requirements are per-row only: rotation is
//! keyed by unique token value, so concurrent rotations of *different*
//! credentials never contend, and concurrent rotations of the *same*
//! credential resolve as last-write-wins.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{
    credential::RefreshCredential,
    error::{StoreError, StoreResult},
    types::{CredentialId, SubjectId},
};

/// Persistence layer for refresh-credential lifecycle operations.
///
/// Absence is not an error: the lookup methods return `Ok(None)` when no
/// row matches, and callers map that to an authentication failure, never a
/// server fault.
///
/// # Error Handling
///
/// Operations return [`StoreResult`] with appropriate [`StoreError`]
/// variants. A duplicate token value on [`create`](Self::create) or
/// [`update`](Self::update) is a [`StoreError::Conflict`], a retryable
/// collision rather than corruption.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new credential row and assigns its id.
    ///
    /// The `id` field of the input is ignored; the returned record carries
    /// the assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a row with the same token value
    /// already exists, or a backend error if the engine is unavailable.
    async fn create(&self, credential: RefreshCredential) -> StoreResult<RefreshCredential>;

    /// Returns the most recent non-revoked, non-expired credential for a
    /// subject, or `None` when absent.
    ///
    /// "Most recent" is by creation time, with the row id breaking ties.
    async fn get_active_by_subject(
        &self,
        subject_id: SubjectId,
    ) -> StoreResult<Option<RefreshCredential>>;

    /// Returns the credential with the given token value, or `None`.
    ///
    /// Exact-match lookup used during refresh and logout. Revoked and
    /// expired rows are still returned; the caller decides how to treat
    /// them.
    async fn get_by_token(&self, token: &str) -> StoreResult<Option<RefreshCredential>>;

    /// Replaces the row identified by `credential.id`.
    ///
    /// Used for rotation (new token value and expiry on the same row) and
    /// revocation (revoked flag set).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row has the given id, or
    /// [`StoreError::Conflict`] if the new token value collides with a
    /// different row.
    async fn update(&self, credential: &RefreshCredential) -> StoreResult<()>;

    /// Deletes every row whose expiry lies strictly before `now` and
    /// returns the number of rows removed.
    ///
    /// Idempotent: a second sweep with the same `now` removes nothing. A
    /// row expiring exactly at `now` survives until a later sweep. Safe to
    /// run concurrently with normal traffic.
    async fn reap_expired(&self, now: DateTime<Utc>) -> StoreResult<u64>;
}

/// In-memory implementation of [`CredentialStore`] for testing.
///
/// Stores rows in a thread-safe hash map keyed by row id, suitable for unit
/// tests and development. It does not persist data between restarts.
///
/// # Thread Safety
///
/// Uses [`parking_lot::RwLock`] for efficient concurrent access with
/// reader-writer semantics. Cloning shares the underlying state.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use folio_access_store::{CredentialStore, MemoryCredentialStore, RefreshCredential};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryCredentialStore::new();
///
///     let credential = RefreshCredential::builder()
///         .subject_id(1)
///         .token("token-abc".to_owned())
///         .expires_at(Utc::now() + Duration::hours(72))
///         .build();
///
///     let stored = store.create(credential).await?;
///     assert_eq!(i64::from(stored.id), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    /// Rows indexed by assigned id.
    rows: Arc<RwLock<HashMap<CredentialId, RefreshCredential>>>,
    /// Next id to assign.
    next_id: Arc<AtomicI64>,
}

impl MemoryCredentialStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self { rows: Arc::new(RwLock::new(HashMap::new())), next_id: Arc::new(AtomicI64::new(0)) }
    }

    /// Returns the number of rows currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns `true` when the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    #[tracing::instrument(skip(self, credential), fields(subject_id = %credential.subject_id))]
    async fn create(&self, mut credential: RefreshCredential) -> StoreResult<RefreshCredential> {
        let mut rows = self.rows.write();

        if rows.values().any(|row| row.token == credential.token) {
            return Err(StoreError::conflict("duplicate token value"));
        }

        credential.id = CredentialId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        rows.insert(credential.id, credential.clone());
        Ok(credential)
    }

    #[tracing::instrument(skip(self))]
    async fn get_active_by_subject(
        &self,
        subject_id: SubjectId,
    ) -> StoreResult<Option<RefreshCredential>> {
        let rows = self.rows.read();
        let now = Utc::now();

        let newest = rows
            .values()
            .filter(|row| row.subject_id == subject_id && row.is_active(now))
            .max_by_key(|row| (row.created_at, row.id))
            .cloned();

        Ok(newest)
    }

    #[tracing::instrument(skip(self, token))]
    async fn get_by_token(&self, token: &str) -> StoreResult<Option<RefreshCredential>> {
        let rows = self.rows.read();
        Ok(rows.values().find(|row| row.token == token).cloned())
    }

    #[tracing::instrument(skip(self, credential), fields(id = %credential.id))]
    async fn update(&self, credential: &RefreshCredential) -> StoreResult<()> {
        let mut rows = self.rows.write();

        if !rows.contains_key(&credential.id) {
            return Err(StoreError::not_found(credential.id.to_string()));
        }
        if rows.values().any(|row| row.id != credential.id && row.token == credential.token) {
            return Err(StoreError::conflict("duplicate token value"));
        }

        rows.insert(credential.id, credential.clone());
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn reap_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|_, row| row.expires_at >= now);
        Ok((before - rows.len()) as u64)
    }
}
