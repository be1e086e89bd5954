//! Flat role value type.
//!
//! Roles are a closed set compared by name; there is no hierarchy and no
//! permission graph. Authorization compares role names against a per
//! operation allow-list, plus a fixed elevated set that bypasses ownership
//! checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A role name that is not part of the closed set.
///
/// The session layer treats this as a malformed credential: role names are
/// embedded in verified tokens, so an unknown name means the token was not
/// issued by this system's current configuration.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Role assigned to a subject, embedded by name in access credentials.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role assigned at sign-up.
    User,
    /// May create and manage own content.
    Author,
    /// Elevated: may manage any subject's content.
    Moderator,
    /// Elevated: full administrative access.
    Admin,
}

/// Roles that bypass ownership checks.
pub const ELEVATED_ROLES: &[Role] = &[Role::Moderator, Role::Admin];

impl Role {
    /// Returns the canonical role name as embedded in credentials.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Author => "author",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// Returns `true` if the role is in [`ELEVATED_ROLES`].
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        ELEVATED_ROLES.contains(self)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "user" => Ok(Role::User),
            "author" => Ok(Role::Author),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
