//! Session flows and the exposed surface of the Folio access core.
//!
//! This crate composes the other access crates into the operations the HTTP
//! boundary consumes: sign-up, login, refresh rotation and logout, plus the
//! bearer-credential middleware surface and the gates handlers consult
//! before touching owner-scoped data.
//!
//! # Control Flow
//!
//! ```text
//! inbound request
//!   → admission controller           (folio-access-admission, at the boundary)
//!   → Authenticator::authenticate_bearer
//!       verify access credential → Identity into the request context
//!   → require_role / require_owner   (folio-access-policy, via this crate)
//!   → handler
//! ```
//!
//! Refresh and logout additionally cross-check the presented refresh
//! credential against the credential store. That cross-check is what makes
//! revocation meaningful despite the token remaining cryptographically
//! valid until its embedded expiry.

#![deny(unsafe_code)]

/// Relational-layer contracts.
pub mod directory;
/// The client-facing error taxonomy.
pub mod error;
/// Bearer extraction and gate adapters.
pub mod middleware;
/// Password digests.
pub mod password;
/// Sign-up, login, refresh and logout.
pub mod service;

pub use directory::{MemoryUserDirectory, NewUser, UserDirectory, UserProfile, UserRecord};
pub use error::{AccessError, UnauthenticatedReason};
pub use middleware::{Authenticator, require_owner, require_role};
pub use service::{
    AuthenticatedSession, ClientOrigin, LoginRequest, RotatedTokens, SessionService,
    SignUpRequest,
};
