//! Shared test utilities for authentication testing.
//!
//! This module provides a canonical test configuration, helpers for signing
//! arbitrary claim payloads (expired tokens, missing claims) and for
//! crafting raw attack tokens (`alg: "none"`, algorithm substitution), and
//! an assertion macro for [`AuthnError`](crate::AuthnError) variants. It is
//! feature-gated behind `testutil` to prevent leaking into production
//! builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! folio-access-authn = { path = "../authn", features = ["testutil"] }
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use crate::config::TokenConfig;

/// Returns a token configuration with fixed distinct secrets and the
/// default lifetimes.
///
/// # Panics
///
/// Panics if the canonical test values fail validation (should not happen).
pub fn test_config() -> TokenConfig {
    TokenConfig::builder()
        .access_secret("test-access-secret-0123456789")
        .refresh_secret("test-refresh-secret-0123456789")
        .build()
        .expect("test config is valid")
}

/// Signs an arbitrary JSON claims payload as HS256 with the given secret.
///
/// Unlike the authority's issue paths this places no constraints on the
/// claims, which makes it suitable for crafting expired tokens or tokens
/// with missing fields that still carry a valid signature.
///
/// # Panics
///
/// Panics if encoding fails (should not happen with valid inputs).
pub fn sign_with_secret(claims: &serde_json::Value, secret: &[u8]) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("failed to encode test token")
}

/// Creates a raw token string from arbitrary header and payload JSON.
///
/// The result has the structure `{header_b64}.{payload_b64}.` with an empty
/// signature. This is useful for testing rejection of malformed or attack
/// tokens (e.g., `alg: "none"`, algorithm confusion).
///
/// # Panics
///
/// Panics if JSON serialization fails.
pub fn craft_raw_token(
    header_json: &serde_json::Value,
    payload_json: &serde_json::Value,
) -> String {
    format!("{}.{}.", encode_segment(header_json), encode_segment(payload_json))
}

/// Encodes a JSON value as one base64url token segment (no padding).
///
/// # Panics
///
/// Panics if JSON serialization fails.
pub fn encode_segment(value: &serde_json::Value) -> String {
    URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).expect("segment json"))
}

/// Asserts that a [`Result<T, AuthnError>`](crate::Result) is an `Err`
/// matching the given [`AuthnError`](crate::AuthnError) variant.
///
/// On failure, prints the expected variant and the actual result for
/// debugging.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use folio_access_authn::{AuthnError, assert_authn_error};
///
/// let result: Result<(), AuthnError> = Err(AuthnError::token_expired());
/// assert_authn_error!(result, TokenExpired);
/// ```
#[macro_export]
macro_rules! assert_authn_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::error::AuthnError::$variant { .. })),
            "expected AuthnError::{}, got: {:?}",
            stringify!($variant),
            $result,
        );
    };
    ($result:expr, $variant:ident, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::error::AuthnError::$variant { .. })),
            "{}: expected AuthnError::{}, got: {:?}",
            $msg,
            stringify!($variant),
            $result,
        );
    };
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::AuthnError;

    #[test]
    fn test_config_is_valid_and_distinct() {
        let config = test_config();
        assert_ne!(config.access_secret(), config.refresh_secret());
    }

    #[test]
    fn test_sign_with_secret_produces_three_parts() {
        let token = sign_with_secret(&json!({"sub": 1, "exp": 2_000_000_000u64}), b"secret");
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(!parts[2].is_empty(), "signature should not be empty");
    }

    #[test]
    fn test_craft_raw_token_has_empty_signature() {
        let token = craft_raw_token(&json!({"alg": "none"}), &json!({"sub": 1}));
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[2].is_empty(), "signature should be empty for raw tokens");
    }

    #[test]
    fn test_assert_authn_error_matches() {
        let result: Result<(), AuthnError> = Err(AuthnError::token_expired());
        assert_authn_error!(result, TokenExpired);
        assert_authn_error!(result, TokenExpired, "token should be expired");
    }
}
