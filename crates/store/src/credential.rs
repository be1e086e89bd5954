//! Persisted refresh-credential record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CredentialId, SubjectId};

/// A persisted refresh credential.
///
/// One row per logical session. The `token` value is the lookup key and is
/// unique across the store; rotation replaces `token` and `expires_at` on
/// the same row, revocation sets the `revoked` flag, and only the expiry
/// sweep deletes rows.
///
/// # Validity Rules
///
/// A credential is honored for rotation only when all of these hold:
/// - `revoked == false`
/// - `expires_at > now`
///
/// Revoked and expired credentials are terminal; neither is ever reused.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use folio_access_store::RefreshCredential;
///
/// // Minimal record: id defaults to 0 until the store assigns one.
/// let credential = RefreshCredential::builder()
///     .subject_id(42)
///     .token("signed-refresh-token".to_owned())
///     .expires_at(Utc::now() + Duration::hours(72))
///     .build();
///
/// assert!(!credential.revoked);
/// assert!(credential.is_active(Utc::now()));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, bon::Builder)]
#[serde(deny_unknown_fields)]
pub struct RefreshCredential {
    /// Row identifier, assigned by the store on create.
    ///
    /// The value supplied at build time is ignored by
    /// [`create`](crate::CredentialStore::create), which returns the stored
    /// record with the assigned id.
    #[builder(into, default = CredentialId(0))]
    pub id: CredentialId,

    /// Subject that owns this credential.
    #[builder(into)]
    pub subject_id: SubjectId,

    /// The opaque credential value presented by clients.
    ///
    /// Unique across the store; used as the lookup key during refresh and
    /// logout. Itself a signed token embedding the subject id and expiry.
    pub token: String,

    /// Source address observed when the credential was issued.
    #[builder(into, default)]
    pub origin_ip: String,

    /// User agent observed when the credential was issued.
    #[builder(into, default)]
    pub origin_user_agent: String,

    /// Instant after which the credential is no longer honored.
    ///
    /// The expiry sweep deletes rows whose `expires_at` lies in the past.
    pub expires_at: DateTime<Utc>,

    /// Whether the credential has been explicitly revoked (logout).
    ///
    /// Soft delete: the row remains until reaped so that presenting the
    /// revoked value can be distinguished from presenting garbage in
    /// internal diagnostics.
    #[builder(default = false)]
    pub revoked: bool,

    /// When the row was created.
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,

    /// When the row was last mutated (rotation or revocation).
    #[builder(default = Utc::now())]
    pub updated_at: DateTime<Utc>,
}

impl RefreshCredential {
    /// Returns `true` if the credential's expiry lies at or before `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Returns `true` if the credential is neither revoked nor expired.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}
