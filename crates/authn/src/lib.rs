//! # Folio Access Authentication
//!
//! Bearer-credential issuance and verification for the Folio access core.
//!
//! This crate provides:
//! - **Token issuance**: short-lived access credentials and longer-lived refresh credentials,
//!   signed with distinct symmetric secrets
//! - **Token verification**: algorithm pinning, signature and expiry checks, classified errors
//! - **Configuration**: validated secrets and lifetimes
//!
//! ## Design
//!
//! Both credential kinds are stateless-verifiable: a verification is pure
//! in-memory cryptography and never touches storage. Refresh credentials are
//! *additionally* cross-checked against the credential store by the session
//! layer before being honored for rotation; that cross-check, not the
//! cryptography, is what makes revocation possible.
//!
//! Key separation: the access and refresh secrets are distinct, so a leaked
//! refresh secret cannot forge access credentials and vice versa. The
//! configuration builder rejects equal secrets.
//!
//! ## Example
//!
//! ```
//! use folio_access_authn::{TokenAuthority, TokenConfig};
//! use folio_access_store::SubjectId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TokenConfig::builder()
//!     .access_secret("access-secret-0123456789")
//!     .refresh_secret("refresh-secret-0123456789")
//!     .build()?;
//! let authority = TokenAuthority::new(config);
//!
//! let issued = authority.issue_access(SubjectId::from(42), "author")?;
//! let claims = authority.verify_access(&issued.token)?;
//!
//! assert_eq!(claims.sub, SubjectId::from(42));
//! assert_eq!(claims.role, "author");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Typed claim structures.
pub mod claims;
/// Secrets and lifetimes.
pub mod config;
/// Authentication error types.
pub mod error;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
/// Issuance and verification.
pub mod tokens;
/// Algorithm validation.
pub mod validation;

pub use claims::{AccessClaims, RefreshClaims};
pub use config::{ConfigError, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL, TokenConfig};
pub use error::{AuthnError, Result};
pub use tokens::{SignedToken, TokenAuthority};
pub use validation::{EXPECTED_ALGORITHM, FORBIDDEN_ALGORITHMS, validate_algorithm};
