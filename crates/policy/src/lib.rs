//! Role and ownership authorization for the Folio access core.
//!
//! A single decision primitive, applied uniformly across every owned
//! resource type (articles, comments, media, user accounts), composed with
//! an independent role gate:
//!
//! ```text
//! request → RoleGate      may this role attempt the operation at all?
//!         → OwnershipGate may it touch *this* resource?
//!                         (owner match, or an elevated role)
//! ```
//!
//! The two-stage design is what lets "any author may create, but only
//! *this* author (or a moderator/admin) may edit *this* article" be
//! expressed without per-resource special-casing.
//!
//! A failed gate is a deny surfaced as a client error, never a server
//! fault. Absence of identity (credential not verified) is a distinct,
//! earlier failure owned by the session layer.
//!
//! # Example
//!
//! ```
//! use folio_access_policy::{Identity, Role, RoleGate, is_authorized};
//! use folio_access_store::SubjectId;
//!
//! let author = Identity::new(SubjectId::from(5), Role::Author);
//!
//! // Stage 1: may authors create articles at all?
//! let gate = RoleGate::new([Role::Author, Role::Admin]);
//! assert!(gate.check(&author).is_ok());
//!
//! // Stage 2: may this author edit the article owned by subject 5?
//! assert!(is_authorized(SubjectId::from(5), author.subject, &[author.role]));
//! ```

#![deny(unsafe_code)]

/// Authenticated identity.
pub mod identity;
/// Decision predicates and gates.
pub mod policy;
/// Flat role value type.
pub mod role;

pub use identity::Identity;
pub use policy::{OwnershipGate, PolicyError, RoleGate, is_authorized, is_role_allowed};
pub use role::{ELEVATED_ROLES, Role, UnknownRole};
