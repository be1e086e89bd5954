//! Signing secrets and credential lifetimes.
//!
//! This module provides [`TokenConfig`], which carries the two symmetric
//! signing secrets and the two credential lifetimes. Loading values from the
//! environment or a file is the host application's job; this type only
//! validates them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// Default access-credential lifetime (15 minutes).
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Default refresh-credential lifetime (4320 minutes / 72 hours).
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(4_320 * 60);

/// Invalid token configuration.
#[derive(Debug, Error)]
#[error("Invalid token configuration: {0}")]
pub struct ConfigError(pub(crate) String);

/// Configuration for the token authority.
///
/// # Key Separation
///
/// The access and refresh secrets must differ: a leaked refresh secret must
/// not allow forging access credentials, and vice versa. The builder rejects
/// equal or empty secrets.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use folio_access_authn::TokenConfig;
///
/// let config = TokenConfig::builder()
///     .access_secret("access-secret-0123456789")
///     .refresh_secret("refresh-secret-0123456789")
///     .access_ttl(Duration::from_secs(300))
///     .build()?;
///
/// assert_eq!(config.access_ttl(), Duration::from_secs(300));
/// # Ok::<(), folio_access_authn::ConfigError>(())
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    /// Secret for signing and verifying access credentials.
    pub(crate) access_secret: Zeroizing<String>,

    /// Secret for signing and verifying refresh credentials.
    pub(crate) refresh_secret: Zeroizing<String>,

    /// Access-credential lifetime.
    #[serde(with = "humantime_serde", default = "default_access_ttl")]
    pub(crate) access_ttl: Duration,

    /// Refresh-credential lifetime.
    #[serde(with = "humantime_serde", default = "default_refresh_ttl")]
    pub(crate) refresh_ttl: Duration,
}

fn default_access_ttl() -> Duration {
    DEFAULT_ACCESS_TTL
}

fn default_refresh_ttl() -> Duration {
    DEFAULT_REFRESH_TTL
}

// Secrets must never appear in logs; render placeholders instead.
impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

#[bon::bon]
impl TokenConfig {
    /// Creates a new configuration, validating all fields.
    ///
    /// # Arguments
    ///
    /// * `access_secret` - Secret for access credentials. Must be non-empty.
    /// * `refresh_secret` - Secret for refresh credentials. Must be non-empty and differ from
    ///   `access_secret`.
    ///
    /// # Optional Fields
    ///
    /// * `access_ttl` - Access-credential lifetime (default: 15 minutes).
    /// * `refresh_ttl` - Refresh-credential lifetime (default: 72 hours).
    ///
    /// # Errors
    ///
    /// Returns an error if either secret is empty, the secrets are equal,
    /// or either lifetime is zero.
    #[builder]
    pub fn new(
        #[builder(into)] access_secret: String,
        #[builder(into)] refresh_secret: String,
        #[builder(default = DEFAULT_ACCESS_TTL)] access_ttl: Duration,
        #[builder(default = DEFAULT_REFRESH_TTL)] refresh_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        if access_secret.is_empty() {
            return Err(ConfigError("access secret cannot be empty".into()));
        }
        if refresh_secret.is_empty() {
            return Err(ConfigError("refresh secret cannot be empty".into()));
        }
        if access_secret == refresh_secret {
            return Err(ConfigError("access and refresh secrets must differ".into()));
        }
        if access_ttl.is_zero() || refresh_ttl.is_zero() {
            return Err(ConfigError("credential lifetimes must be positive".into()));
        }

        Ok(Self {
            access_secret: Zeroizing::new(access_secret),
            refresh_secret: Zeroizing::new(refresh_secret),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Returns the access-credential secret bytes.
    #[must_use]
    pub fn access_secret(&self) -> &[u8] {
        self.access_secret.as_bytes()
    }

    /// Returns the refresh-credential secret bytes.
    #[must_use]
    pub fn refresh_secret(&self) -> &[u8] {
        self.refresh_secret.as_bytes()
    }

    /// Returns the access-credential lifetime.
    #[must_use]
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Returns the refresh-credential lifetime.
    #[must_use]
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_with_defaults() {
        let config = TokenConfig::builder()
            .access_secret("access-secret")
            .refresh_secret("refresh-secret")
            .build()
            .unwrap();

        assert_eq!(config.access_ttl(), DEFAULT_ACCESS_TTL);
        assert_eq!(config.refresh_ttl(), DEFAULT_REFRESH_TTL);
        assert_eq!(config.access_secret(), b"access-secret");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result =
            TokenConfig::builder().access_secret("").refresh_secret("refresh-secret").build();
        assert!(result.is_err());

        let result =
            TokenConfig::builder().access_secret("access-secret").refresh_secret("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_equal_secrets_rejected() {
        let result =
            TokenConfig::builder().access_secret("same").refresh_secret("same").build();

        let err = result.err().expect("equal secrets must be rejected");
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let result = TokenConfig::builder()
            .access_secret("access-secret")
            .refresh_secret("refresh-secret")
            .access_ttl(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = TokenConfig::builder()
            .access_secret("super-secret-access")
            .refresh_secret("super-secret-refresh")
            .build()
            .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-access"));
        assert!(!debug.contains("super-secret-refresh"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_deserialization_with_default_ttls() {
        let json = r#"{
            "access_secret": "access-secret",
            "refresh_secret": "refresh-secret"
        }"#;

        let config: TokenConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.access_ttl(), DEFAULT_ACCESS_TTL);
        assert_eq!(config.refresh_ttl(), DEFAULT_REFRESH_TTL);
    }

    #[test]
    fn test_deserialization_with_humantime_ttls() {
        let json = r#"{
            "access_secret": "access-secret",
            "refresh_secret": "refresh-secret",
            "access_ttl": "15m",
            "refresh_ttl": "72h"
        }"#;

        let config: TokenConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.access_ttl(), Duration::from_secs(900));
        assert_eq!(config.refresh_ttl(), Duration::from_secs(259_200));
    }

    #[test]
    fn test_deserialization_rejects_unknown_fields() {
        let json = r#"{
            "access_secret": "a",
            "refresh_secret": "r",
            "surprise": true
        }"#;

        let result: Result<TokenConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
