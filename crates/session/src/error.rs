//! The client-facing error taxonomy.
//!
//! Six categories cross this crate's boundary: unauthenticated, forbidden,
//! conflict, throttled and internal, with "not found" folded into
//! unauthenticated for credential lookups. The unauthenticated category
//! keeps an *internal* reason for logging while its `Display` stays
//! deliberately uniform: distinguishing a bad signature from an expired
//! token in responses would hand attackers an oracle.

use thiserror::Error;

use folio_access_admission::AdmissionError;
use folio_access_authn::AuthnError;
use folio_access_policy::PolicyError;
use folio_access_store::StoreError;

/// Internal classification of an authentication failure.
///
/// Never shown to clients; the session layer logs it at debug level. The
/// unknown-credential and revoked cases are deliberately indistinguishable
/// from expiry on the wire so that probing for the existence of a token
/// value reveals nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnauthenticatedReason {
    /// No credential was presented.
    MissingCredential,
    /// The credential could not be decoded.
    Malformed,
    /// The signature did not verify.
    BadSignature,
    /// The embedded expiry has passed.
    Expired,
    /// The refresh credential has no row in the store.
    UnknownCredential,
    /// The refresh credential's row is flagged revoked.
    Revoked,
    /// The presented email/password pair did not match.
    BadCredentials,
}

/// Errors crossing the session boundary.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccessError {
    /// The request carries no acceptable identity.
    ///
    /// The `Display` form is identical for every reason; see
    /// [`UnauthenticatedReason`].
    #[error("unauthorized")]
    Unauthenticated {
        /// Internal classification, for logs only.
        reason: UnauthenticatedReason,
    },

    /// Authenticated, but the role or ownership gate denied the operation.
    #[error("{0}")]
    Forbidden(#[source] PolicyError),

    /// A uniqueness rule was violated (duplicate sign-up email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The admission controller rejected the request.
    #[error("Too many requests")]
    Throttled,

    /// A backend fault: storage or signing failure.
    ///
    /// The only category logged at error severity and never attributable
    /// to client input. Raw backend text stays in the source chain and out
    /// of the client-facing message.
    #[error("Internal error")]
    Internal {
        /// The wrapped backend failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AccessError {
    /// Creates an `Unauthenticated` error with the given internal reason.
    #[must_use]
    pub fn unauthenticated(reason: UnauthenticatedReason) -> Self {
        Self::Unauthenticated { reason }
    }

    /// Creates an `Internal` error wrapping the given backend failure.
    #[must_use]
    pub fn internal(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal { source: Box::new(source) }
    }
}

impl From<AuthnError> for AccessError {
    fn from(err: AuthnError) -> Self {
        let reason = match &err {
            AuthnError::TokenExpired => UnauthenticatedReason::Expired,
            AuthnError::InvalidSignature => UnauthenticatedReason::BadSignature,
            AuthnError::SigningFailed(_) => return Self::internal(err),
            // Malformed structure, unsupported algorithm, missing claims.
            _ => UnauthenticatedReason::Malformed,
        };
        tracing::debug!(?reason, "credential rejected");
        Self::Unauthenticated { reason }
    }
}

impl From<StoreError> for AccessError {
    fn from(err: StoreError) -> Self {
        Self::internal(err)
    }
}

impl From<PolicyError> for AccessError {
    fn from(err: PolicyError) -> Self {
        Self::Forbidden(err)
    }
}

impl From<AdmissionError> for AccessError {
    fn from(err: AdmissionError) -> Self {
        // The retry hint stays at the HTTP boundary (Retry-After header);
        // the taxonomy only records the category.
        match err {
            AdmissionError::Throttled { .. } => Self::Throttled,
            other => Self::internal(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_display_is_uniform() {
        // Every reason renders identically; the distinction is log-only.
        let reasons = [
            UnauthenticatedReason::MissingCredential,
            UnauthenticatedReason::Malformed,
            UnauthenticatedReason::BadSignature,
            UnauthenticatedReason::Expired,
            UnauthenticatedReason::UnknownCredential,
            UnauthenticatedReason::Revoked,
            UnauthenticatedReason::BadCredentials,
        ];

        for reason in reasons {
            assert_eq!(AccessError::unauthenticated(reason).to_string(), "unauthorized");
        }
    }

    #[test]
    fn test_authn_errors_collapse_to_unauthenticated() {
        let err: AccessError = AuthnError::token_expired().into();
        assert!(matches!(
            err,
            AccessError::Unauthenticated { reason: UnauthenticatedReason::Expired }
        ));

        let err: AccessError = AuthnError::invalid_signature().into();
        assert!(matches!(
            err,
            AccessError::Unauthenticated { reason: UnauthenticatedReason::BadSignature }
        ));

        let err: AccessError = AuthnError::invalid_token_format("junk").into();
        assert!(matches!(
            err,
            AccessError::Unauthenticated { reason: UnauthenticatedReason::Malformed }
        ));
    }

    #[test]
    fn test_signing_failure_is_internal_not_unauthenticated() {
        let signing = AuthnError::SigningFailed(jsonwebtoken_error());
        let err: AccessError = signing.into();
        assert!(matches!(err, AccessError::Internal { .. }));
    }

    #[test]
    fn test_store_errors_become_internal_with_source() {
        use std::error::Error;

        let err: AccessError = StoreError::connection("engine down").into();
        assert_eq!(err.to_string(), "Internal error", "no backend text in the message");
        assert!(err.source().expect("source").to_string().contains("engine down"));
    }

    #[test]
    fn test_admission_rejection_becomes_throttled() {
        let err: AccessError =
            AdmissionError::throttled(std::time::Duration::from_secs(1)).into();
        assert!(matches!(err, AccessError::Throttled));
        assert_eq!(err.to_string(), "Too many requests");
    }

    #[test]
    fn test_policy_denial_becomes_forbidden() {
        let denial = PolicyError::NotOwner { subject: folio_access_store::SubjectId::from(7) };
        let err: AccessError = denial.into();
        assert!(matches!(err, AccessError::Forbidden(_)));
    }

    fn jsonwebtoken_error() -> jsonwebtoken::errors::Error {
        jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat)
    }
}
