//! Store error types and result alias.
//!
//! All credential-store backends map their internal failures to these
//! standardized variants. Callers can rely on the distinction between
//! "absent" (`Ok(None)` from lookups), client-attributable conflicts, and
//! backend faults.

use std::sync::Arc;

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for credential-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during credential-store operations.
///
/// Errors preserve their source chain via the `#[source]` attribute,
/// enabling debugging tools to display the full error context.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The referenced credential row was not found.
    ///
    /// Lookups by token value or subject return `Ok(None)` for absence;
    /// this variant is reserved for operations that require an existing
    /// row, such as [`update`](crate::CredentialStore::update).
    #[error("Credential not found: {key}")]
    NotFound {
        /// The identifier that was not found.
        key: String,
    },

    /// A uniqueness constraint was violated.
    ///
    /// With high-entropy token generation this should never happen, but
    /// callers must treat it as a retryable collision, not data corruption.
    #[error("Constraint conflict: {message}")]
    Conflict {
        /// Description of the violated constraint.
        message: String,
    },

    /// Connection or network error while reaching the backing engine.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error that caused this connection failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Serialization or deserialization error.
    ///
    /// Typically indicates row corruption or schema incompatibility.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
        /// The underlying error that caused serialization to fail.
        #[source]
        source: Option<BoxError>,
    },

    /// Internal backend error.
    ///
    /// Catch-all for backend-specific errors that don't fit other
    /// categories.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
        /// The underlying error that caused this internal failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Operation exceeded its time limit.
    #[error("Operation timeout")]
    Timeout,
}

impl StoreError {
    /// Creates a new `NotFound` error for the given identifier.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a new `Conflict` error with the given message.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict { message: message.into() }
    }

    /// Creates a new `Connection` error with the given message.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Creates a new `Connection` error with a message and source error.
    #[must_use]
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Serialization` error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into(), source: None }
    }

    /// Creates a new `Serialization` error with a message and source error.
    #[must_use]
    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Internal` error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Creates a new `Internal` error with a message and source error.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Returns `true` if retrying the operation may succeed.
    ///
    /// Conflicts (token-value collisions), connection failures and timeouts
    /// are transient; the remaining variants are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Connection { .. } | Self::Timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::not_found("token-abc");
        assert_eq!(err.to_string(), "Credential not found: token-abc");

        let err = StoreError::conflict("duplicate token value");
        assert_eq!(err.to_string(), "Constraint conflict: duplicate token value");

        let err = StoreError::timeout();
        assert_eq!(err.to_string(), "Operation timeout");
    }

    #[test]
    fn test_source_chain_preserved() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StoreError::connection_with_source("connect failed", io_err);

        let source = err.source();
        assert!(source.is_some(), "source chain must be preserved");
        assert_eq!(source.expect("source exists").to_string(), "refused");
    }

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::conflict("dup").is_transient());
        assert!(StoreError::connection("down").is_transient());
        assert!(StoreError::timeout().is_transient());

        assert!(!StoreError::not_found("x").is_transient());
        assert!(!StoreError::serialization("bad row").is_transient());
        assert!(!StoreError::internal("bug").is_transient());
    }
}
