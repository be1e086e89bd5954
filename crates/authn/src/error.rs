//! Authentication error types.
//!
//! This module defines errors that can occur during credential issuance and
//! verification. Verification failures stay internally classified (the
//! session layer logs them) while the HTTP boundary collapses them into a
//! single "unauthenticated" response to avoid signature-oracle leakage.

use thiserror::Error;

/// Credential issuance and verification errors.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthnError {
    /// Malformed token - cannot be decoded.
    #[error("Invalid token format: {0}")]
    InvalidTokenFormat(String),

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Algorithm not in allowed list.
    ///
    /// Covers both the "none" algorithm and algorithm-substitution
    /// attempts; see [`crate::validation`].
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Required claim is missing.
    #[error("Missing claim: {0}")]
    MissingClaim(String),

    /// The signing backend failed to produce a token.
    ///
    /// The only variant that is not attributable to client input; it
    /// indicates fatal misconfiguration and is surfaced as an internal
    /// fault.
    #[error("Token signing failed")]
    SigningFailed(#[source] jsonwebtoken::errors::Error),
}

impl AuthnError {
    /// Creates a new `InvalidTokenFormat` error with the given detail.
    #[must_use]
    pub fn invalid_token_format(detail: impl Into<String>) -> Self {
        Self::InvalidTokenFormat(detail.into())
    }

    /// Creates a new `TokenExpired` error.
    #[must_use]
    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    /// Creates a new `InvalidSignature` error.
    #[must_use]
    pub fn invalid_signature() -> Self {
        Self::InvalidSignature
    }

    /// Creates a new `UnsupportedAlgorithm` error with the given detail.
    #[must_use]
    pub fn unsupported_algorithm(detail: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm(detail.into())
    }

    /// Creates a new `MissingClaim` error for the given claim name.
    #[must_use]
    pub fn missing_claim(claim: impl Into<String>) -> Self {
        Self::MissingClaim(claim.into())
    }

    /// Returns `true` for failures the HTTP boundary must surface as a
    /// single undifferentiated "unauthenticated" response.
    ///
    /// Everything except [`SigningFailed`](Self::SigningFailed) is caused by
    /// the presented credential; `SigningFailed` is a server fault.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, Self::SigningFailed(_))
    }
}

impl From<jsonwebtoken::errors::Error> for AuthnError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidToken => {
                AuthnError::invalid_token_format("invalid token structure")
            },
            ErrorKind::InvalidSignature => AuthnError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthnError::TokenExpired,
            ErrorKind::InvalidAlgorithm => {
                AuthnError::unsupported_algorithm("algorithm not supported")
            },
            ErrorKind::InvalidAlgorithmName => {
                AuthnError::unsupported_algorithm("unrecognized algorithm name")
            },
            ErrorKind::MissingRequiredClaim(claim) => AuthnError::missing_claim(claim.clone()),
            _ => AuthnError::invalid_token_format(format!("JWT error: {}", err)),
        }
    }
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthnError>;
