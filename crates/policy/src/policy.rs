//! Decision predicates and the gates that wrap them.

use thiserror::Error;

use folio_access_store::SubjectId;

use crate::{identity::Identity, role::Role};

/// Authorization denial.
///
/// Always a client error: the requester is authenticated but not permitted.
/// The messages name the operation-level reason without echoing resource
/// contents.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PolicyError {
    /// The requester's role is not in the operation's allow-list.
    #[error("Role '{role}' may not perform this operation")]
    RoleNotAllowed {
        /// The denied role.
        role: Role,
    },

    /// The requester neither owns the resource nor holds an elevated role.
    #[error("Subject {subject} is not the owner of this resource")]
    NotOwner {
        /// The denied subject.
        subject: SubjectId,
    },
}

/// Returns `true` if the requester owns the resource or holds any elevated
/// role.
///
/// The ownership comparison runs only when no role in `roles` is elevated;
/// a moderator or admin is authorized regardless of ownership.
///
/// # Examples
///
/// ```
/// use folio_access_policy::{Role, is_authorized};
/// use folio_access_store::SubjectId;
///
/// assert!(is_authorized(SubjectId::from(5), SubjectId::from(5), &[]));
/// assert!(!is_authorized(SubjectId::from(5), SubjectId::from(7), &[Role::User]));
/// assert!(is_authorized(SubjectId::from(5), SubjectId::from(7), &[Role::Moderator]));
/// ```
#[must_use]
pub fn is_authorized(
    resource_owner: SubjectId,
    requester: SubjectId,
    roles: &[Role],
) -> bool {
    if roles.iter().any(Role::is_elevated) {
        return true;
    }

    resource_owner == requester
}

/// Returns `true` if any requester role appears in the operation's
/// allow-list.
///
/// # Examples
///
/// ```
/// use folio_access_policy::{Role, is_role_allowed};
///
/// assert!(is_role_allowed(&[Role::Author], &[Role::Author, Role::Admin]));
/// assert!(!is_role_allowed(&[Role::User], &[Role::Author, Role::Admin]));
/// ```
#[must_use]
pub fn is_role_allowed(roles: &[Role], allowed: &[Role]) -> bool {
    roles.iter().any(|role| allowed.contains(role))
}

/// First-stage gate: may this role attempt the operation at all?
///
/// One gate per operation, declared with the roles that may attempt it.
/// Applied before ownership is even evaluated.
#[derive(Clone, Debug)]
pub struct RoleGate {
    allowed: Vec<Role>,
}

impl RoleGate {
    /// Creates a gate allowing the given roles.
    #[must_use]
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self { allowed: allowed.into_iter().collect() }
    }

    /// Checks the identity's role against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::RoleNotAllowed`] when the role is not listed.
    pub fn check(&self, identity: &Identity) -> Result<(), PolicyError> {
        if is_role_allowed(&[identity.role], &self.allowed) {
            Ok(())
        } else {
            Err(PolicyError::RoleNotAllowed { role: identity.role })
        }
    }
}

/// Second-stage gate: may the requester touch *this* resource instance?
///
/// Owner match or elevated role; uniform across every owned resource type.
#[derive(Copy, Clone, Debug, Default)]
pub struct OwnershipGate;

impl OwnershipGate {
    /// Creates the gate.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checks the identity against the resource owner.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NotOwner`] when the requester neither owns
    /// the resource nor holds an elevated role.
    pub fn check(
        &self,
        identity: &Identity,
        resource_owner: SubjectId,
    ) -> Result<(), PolicyError> {
        if is_authorized(resource_owner, identity.subject, &[identity.role]) {
            Ok(())
        } else {
            Err(PolicyError::NotOwner { subject: identity.subject })
        }
    }
}
