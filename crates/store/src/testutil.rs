//! Shared test utilities for credential-store testing.
//!
//! This module provides factories for refresh-credential records and an
//! assertion macro for [`StoreError`](crate::StoreError) variants. It is
//! feature-gated behind `testutil` to prevent leaking into production
//! builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! folio-access-store = { path = "../store", features = ["testutil"] }
//! ```

use chrono::{Duration, Utc};

use crate::credential::RefreshCredential;

/// Creates a credential for the given subject expiring 72 hours from now.
pub fn make_credential(subject_id: i64, token: &str) -> RefreshCredential {
    RefreshCredential::builder()
        .subject_id(subject_id)
        .token(token.to_owned())
        .expires_at(Utc::now() + Duration::hours(72))
        .build()
}

/// Creates a credential whose expiry already lies in the past.
pub fn make_expired_credential(subject_id: i64, token: &str) -> RefreshCredential {
    RefreshCredential::builder()
        .subject_id(subject_id)
        .token(token.to_owned())
        .expires_at(Utc::now() - Duration::minutes(5))
        .build()
}

/// Asserts that a [`StoreResult`](crate::StoreResult) is an `Err` matching
/// the given [`StoreError`](crate::StoreError) variant.
///
/// On failure, prints the expected variant and the actual result for
/// debugging.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use folio_access_store::{StoreError, StoreResult, assert_store_error};
///
/// let result: StoreResult<()> = Err(StoreError::conflict("duplicate token value"));
/// assert_store_error!(result, Conflict);
/// ```
#[macro_export]
macro_rules! assert_store_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::error::StoreError::$variant { .. })),
            "expected StoreError::{}, got: {:?}",
            stringify!($variant),
            $result,
        );
    };
    ($result:expr, $variant:ident, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::error::StoreError::$variant { .. })),
            "{}: expected StoreError::{}, got: {:?}",
            $msg,
            stringify!($variant),
            $result,
        );
    };
}
