//! Credential issuance and verification.
//!
//! # Verification Pipeline
//!
//! ```text
//! token arrives → decode header
//!               → pin algorithm (reject "none" / substitution)
//!               → verify HMAC signature with the per-kind secret
//!               → check expiry (zero leeway)
//!               → typed claims
//! ```
//!
//! Verification is pure in-memory cryptography; no storage lookups and no
//! blocking, so every entry point is synchronous.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Serialize, de::DeserializeOwned};

use folio_access_store::SubjectId;

use crate::{
    claims::{AccessClaims, RefreshClaims},
    config::TokenConfig,
    error::{AuthnError, Result},
    validation::validate_algorithm,
};

/// A freshly signed credential together with its expiry instant.
///
/// The expiry is returned alongside the encoded string so callers can
/// persist a refresh-credential row without re-decoding the token.
#[derive(Clone, Debug)]
pub struct SignedToken {
    /// The encoded three-part token.
    pub token: String,
    /// Instant at which the embedded `exp` claim elapses.
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies both credential kinds.
///
/// Holds the validated [`TokenConfig`]; one instance is shared across all
/// request workers (`&self` everywhere, no interior mutability).
#[derive(Clone, Debug)]
pub struct TokenAuthority {
    config: TokenConfig,
}

impl TokenAuthority {
    /// Creates an authority from a validated configuration.
    #[must_use]
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Issues a short-lived access credential for the given subject and
    /// role.
    ///
    /// # Errors
    ///
    /// Fails only with [`AuthnError::SigningFailed`] on a signing-backend
    /// error, which indicates fatal misconfiguration.
    pub fn issue_access(&self, subject_id: SubjectId, role: &str) -> Result<SignedToken> {
        let (exp, expires_at) = self.expiry(self.config.access_ttl().as_secs());
        let claims = AccessClaims {
            sub: subject_id,
            role: role.to_owned(),
            exp,
            iat: Utc::now().timestamp() as u64,
        };

        let token = sign(&claims, self.config.access_secret())?;
        Ok(SignedToken { token, expires_at })
    }

    /// Regenerates an access credential for an already-known valid session.
    ///
    /// Used when an active refresh credential is found during login, so the
    /// client receives a fresh access credential paired with the *existing*
    /// refresh value. No refresh-credential lookup or re-derivation happens
    /// here.
    ///
    /// # Errors
    ///
    /// Same failure mode as [`issue_access`](Self::issue_access).
    pub fn reissue_access(&self, subject_id: SubjectId, role: &str) -> Result<SignedToken> {
        self.issue_access(subject_id, role)
    }

    /// Issues a longer-lived refresh credential for the given subject.
    ///
    /// Every issuance embeds a fresh UUID `jti`, which makes the encoded
    /// value unique; the credential store depends on that for its lookup
    /// key.
    ///
    /// # Errors
    ///
    /// Fails only with [`AuthnError::SigningFailed`].
    pub fn issue_refresh(&self, subject_id: SubjectId) -> Result<SignedToken> {
        let (exp, expires_at) = self.expiry(self.config.refresh_ttl().as_secs());
        let claims = RefreshClaims {
            sub: subject_id,
            exp,
            iat: Utc::now().timestamp() as u64,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = sign(&claims, self.config.refresh_secret())?;
        Ok(SignedToken { token, expires_at })
    }

    /// Verifies an access credential and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns an error classified as malformed, bad-signature, expired or
    /// unsupported-algorithm. The HTTP boundary must surface all of these
    /// as one undifferentiated "unauthenticated" response (see
    /// [`AuthnError::is_unauthenticated`]).
    #[tracing::instrument(skip_all)]
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims> {
        self.verify(token, self.config.access_secret())
    }

    /// Verifies a refresh credential and returns its claims.
    ///
    /// This checks signature and expiry only. The caller must additionally
    /// cross-check the credential store before honoring the token for
    /// rotation; a revoked credential still verifies here until its
    /// embedded expiry.
    ///
    /// # Errors
    ///
    /// Same classification as [`verify_access`](Self::verify_access).
    #[tracing::instrument(skip_all)]
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims> {
        self.verify(token, self.config.refresh_secret())
    }

    fn verify<T: DeserializeOwned>(&self, token: &str, secret: &[u8]) -> Result<T> {
        let header = jsonwebtoken::decode_header(token)?;
        validate_algorithm(&format!("{:?}", header.alg))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        // No grace window: expiry is exact, per the credential contract.
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<T>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(data.claims)
    }

    /// Computes the `exp` claim and its `DateTime` form for a lifetime in
    /// seconds. Saturates on absurd lifetimes instead of wrapping.
    fn expiry(&self, ttl_secs: u64) -> (u64, DateTime<Utc>) {
        let exp = (Utc::now().timestamp() as u64).saturating_add(ttl_secs);
        let expires_at =
            DateTime::<Utc>::from_timestamp(exp.min(i64::MAX as u64) as i64, 0)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
        (exp, expires_at)
    }
}

fn sign<T: Serialize>(claims: &T, secret: &[u8]) -> Result<String> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(AuthnError::SigningFailed)
}
