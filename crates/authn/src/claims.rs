//! Typed claim structures for both credential kinds.
//!
//! The wire contract is an HMAC-signed three-part token
//! (`header.claims.signature`). Claims carry at minimum the subject id and
//! expiry (Unix seconds); access credentials additionally carry the role
//! name, refresh credentials additionally carry a `jti`.

use serde::{Deserialize, Serialize};

use folio_access_store::SubjectId;

/// Claims embedded in a short-lived access credential.
///
/// ```json
/// {
///   "sub": 42,
///   "role": "author",
///   "exp": 1234567890,
///   "iat": 1234566990
/// }
/// ```
///
/// Verified purely by signature and expiry; never looked up in storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject identifier of the authenticated account.
    pub sub: SubjectId,
    /// Role name assigned to the subject at issuance time.
    pub role: String,
    /// Expiration time (seconds since epoch).
    pub exp: u64,
    /// Issued at (seconds since epoch).
    pub iat: u64,
}

/// Claims embedded in a longer-lived refresh credential.
///
/// The `jti` is a fresh UUID per issuance; it supplies the entropy that
/// makes every refresh-credential value unique, which the credential store
/// relies on for its lookup key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject identifier of the owning account.
    pub sub: SubjectId,
    /// Expiration time (seconds since epoch).
    pub exp: u64,
    /// Issued at (seconds since epoch).
    pub iat: u64,
    /// Unique token id (UUID v4).
    pub jti: String,
}
