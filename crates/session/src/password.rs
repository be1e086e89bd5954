//! Password digests.
//!
//! Argon2id with per-digest random salts. Verification failures and parse
//! failures are both "no match": a stored digest that does not parse is
//! treated the same as a wrong password rather than leaking its state.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AccessError;

/// Hashes a password for storage.
///
/// # Errors
///
/// Returns [`AccessError::Internal`] if the hashing backend fails, which
/// indicates misconfiguration rather than bad input.
pub fn hash_password(password: &str) -> Result<String, AccessError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|err| AccessError::internal(std::io::Error::other(err.to_string())))
}

/// Returns `true` if `password` matches the stored digest.
#[must_use]
pub fn verify_password(password: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}
