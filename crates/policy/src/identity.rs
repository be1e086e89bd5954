//! Authenticated identity.

use folio_access_store::SubjectId;

use crate::role::Role;

/// The identity decoded from a verified access credential.
///
/// Immutable once authenticated for the lifetime of a request: the session
/// layer builds it after verification and downstream gates only read it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Opaque subject identifier.
    pub subject: SubjectId,
    /// The subject's single assigned role.
    pub role: Role,
}

impl Identity {
    /// Creates an identity from its parts.
    #[must_use]
    pub fn new(subject: SubjectId, role: Role) -> Self {
        Self { subject, role }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subject {} ({})", self.subject, self.role)
    }
}
