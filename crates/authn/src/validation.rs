//! Token algorithm validation.
//!
//! This module pins the signing algorithm before any signature work,
//! ensuring algorithm-substitution attempts fail fast.
//!
//! # Security
//!
//! Per RFC 8725, a validator must reject algorithms it does not fully
//! implement. Both credential kinds are signed HS256 with distinct secrets,
//! so HS256 is the only accepted value; "none" is always rejected, and any
//! other name (including an asymmetric algorithm substituted by an attacker
//! hoping the secret is used as a public key) is rejected before the
//! signature is examined.

use crate::error::AuthnError;

/// Token algorithms that are never accepted.
///
/// `none` disables signature verification entirely and is trivially
/// forgeable.
pub const FORBIDDEN_ALGORITHMS: &[&str] = &["none"];

/// The single algorithm both credential kinds are signed with.
pub const EXPECTED_ALGORITHM: &str = "HS256";

/// Validates a token's header algorithm against the pinned expectation.
///
/// # Arguments
///
/// * `alg` - The algorithm name from the token header
///
/// # Errors
///
/// Returns [`AuthnError::UnsupportedAlgorithm`] if:
/// - Algorithm is "none"
/// - Algorithm is anything other than [`EXPECTED_ALGORITHM`]
///
/// # Examples
///
/// ```
/// use folio_access_authn::validate_algorithm;
///
/// assert!(validate_algorithm("HS256").is_ok());
/// assert!(validate_algorithm("none").is_err());
/// assert!(validate_algorithm("RS256").is_err());
/// ```
pub fn validate_algorithm(alg: &str) -> Result<(), AuthnError> {
    if FORBIDDEN_ALGORITHMS.contains(&alg) {
        return Err(AuthnError::unsupported_algorithm(format!(
            "Algorithm '{}' is not allowed for security reasons",
            alg
        )));
    }

    if alg != EXPECTED_ALGORITHM {
        return Err(AuthnError::unsupported_algorithm(format!(
            "Algorithm '{}' does not match the expected {}",
            alg, EXPECTED_ALGORITHM
        )));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_algorithm_accepted() {
        assert!(validate_algorithm("HS256").is_ok());
    }

    #[test]
    fn test_none_rejected_with_security_message() {
        let result = validate_algorithm("none");
        assert!(
            matches!(result, Err(AuthnError::UnsupportedAlgorithm(ref msg)) if msg.contains("not allowed for security reasons"))
        );
    }

    #[test]
    fn test_asymmetric_substitution_rejected() {
        for alg in ["RS256", "RS384", "ES256", "EdDSA", "PS256"] {
            let result = validate_algorithm(alg);
            assert!(
                matches!(result, Err(AuthnError::UnsupportedAlgorithm(_))),
                "expected rejection for substituted algorithm '{alg}'"
            );
        }
    }

    #[test]
    fn test_other_hmac_variants_rejected() {
        // Even sibling HMAC algorithms are rejected: the expectation is
        // pinned to exactly one value.
        assert!(validate_algorithm("HS384").is_err());
        assert!(validate_algorithm("HS512").is_err());
    }

    #[test]
    fn test_constants() {
        assert_eq!(EXPECTED_ALGORITHM, "HS256");
        assert!(FORBIDDEN_ALGORITHMS.contains(&"none"));
        assert!(!FORBIDDEN_ALGORITHMS.contains(&"HS256"));
    }
}
