//! Bearer extraction and gate adapters.
//!
//! The HTTP boundary hands this module the raw `Authorization` header
//! value; it hands back the [`Identity`] to inject into the request
//! context, or an unauthenticated signal. The gate adapters wrap the
//! policy crate's checks and map denials into the session taxonomy, so
//! handlers deal with one error type.

use folio_access_authn::TokenAuthority;
use folio_access_policy::{Identity, OwnershipGate, Role, RoleGate};
use folio_access_store::SubjectId;

use crate::error::{AccessError, UnauthenticatedReason};

/// The scheme prefix expected on the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Verifies bearer credentials and produces request identities.
#[derive(Clone, Debug)]
pub struct Authenticator {
    authority: TokenAuthority,
}

impl Authenticator {
    /// Creates an authenticator over the given token authority.
    #[must_use]
    pub fn new(authority: TokenAuthority) -> Self {
        Self { authority }
    }

    /// Authenticates a request from its `Authorization` header value.
    ///
    /// Strips the `Bearer ` scheme, verifies the access credential and
    /// parses the embedded role name. The caller writes the returned
    /// identity into its request context for downstream gates.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Unauthenticated`], with one uniform
    /// client-facing message, when the header is missing, the scheme is
    /// wrong, the credential fails verification, or the role name is not
    /// part of the closed set.
    #[tracing::instrument(skip_all)]
    pub fn authenticate_bearer(
        &self,
        authorization: Option<&str>,
    ) -> Result<Identity, AccessError> {
        let header = authorization.ok_or_else(|| {
            AccessError::unauthenticated(UnauthenticatedReason::MissingCredential)
        })?;

        let token = header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
            AccessError::unauthenticated(UnauthenticatedReason::MissingCredential)
        })?;

        let claims = self.authority.verify_access(token)?;

        let role: Role = claims.role.parse().map_err(|_| {
            // A verified token with a role outside the closed set was not
            // issued by this configuration.
            AccessError::unauthenticated(UnauthenticatedReason::Malformed)
        })?;

        Ok(Identity::new(claims.sub, role))
    }
}

/// First-stage gate adapter: may this role attempt the operation?
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] when the identity's role is not in
/// the allow-list.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), AccessError> {
    RoleGate::new(allowed.iter().copied()).check(identity)?;
    Ok(())
}

/// Second-stage gate adapter: may this identity touch the resource owned
/// by `resource_owner`?
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] when the identity neither owns the
/// resource nor holds an elevated role.
pub fn require_owner(
    identity: &Identity,
    resource_owner: SubjectId,
) -> Result<(), AccessError> {
    OwnershipGate::new().check(identity, resource_owner)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use folio_access_authn::testutil::{sign_with_secret, test_config};
    use serde_json::json;

    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(TokenAuthority::new(test_config()))
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn test_valid_bearer_yields_identity() {
        let authority = TokenAuthority::new(test_config());
        let authenticator = Authenticator::new(authority.clone());

        let issued = authority.issue_access(SubjectId::from(42), "author").expect("issue");
        let identity = authenticator
            .authenticate_bearer(Some(&bearer(&issued.token)))
            .expect("authenticate");

        assert_eq!(identity.subject, SubjectId::from(42));
        assert_eq!(identity.role, Role::Author);
    }

    #[test]
    fn test_missing_header_rejected() {
        let result = authenticator().authenticate_bearer(None);
        assert!(matches!(
            result,
            Err(AccessError::Unauthenticated {
                reason: UnauthenticatedReason::MissingCredential
            })
        ));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let authenticator = authenticator();

        for header in ["Basic dXNlcjpwYXNz", "bearer lowercase-scheme", "Token abc", "Bearer"] {
            let result = authenticator.authenticate_bearer(Some(header));
            assert!(
                matches!(result, Err(AccessError::Unauthenticated { .. })),
                "header {header:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = authenticator().authenticate_bearer(Some("Bearer not-a-token"));
        assert!(matches!(result, Err(AccessError::Unauthenticated { .. })));
    }

    #[test]
    fn test_unknown_role_name_rejected() {
        let authenticator = authenticator();
        let now = chrono::Utc::now().timestamp() as u64;

        // Correctly signed, but the role is outside the closed set.
        let token = sign_with_secret(
            &json!({"sub": 1, "role": "superuser", "exp": now + 900, "iat": now}),
            test_config().access_secret(),
        );

        let result = authenticator.authenticate_bearer(Some(&bearer(&token)));
        assert!(matches!(
            result,
            Err(AccessError::Unauthenticated { reason: UnauthenticatedReason::Malformed })
        ));
    }

    #[test]
    fn test_gate_adapters_map_denials_to_forbidden() {
        let identity = Identity::new(SubjectId::from(7), Role::User);

        let denied = require_role(&identity, &[Role::Author, Role::Admin])
            .expect_err("user is not in the allow-list");
        assert!(matches!(denied, AccessError::Forbidden(_)));

        let denied = require_owner(&identity, SubjectId::from(5))
            .expect_err("stranger without elevation");
        assert!(matches!(denied, AccessError::Forbidden(_)));

        require_owner(&identity, SubjectId::from(7)).expect("owner passes");
    }

    #[test]
    fn test_unauthenticated_and_forbidden_stay_distinct() {
        // The two failure modes must remain distinguishable internally
        // even though both deny the request.
        let unauthenticated = authenticator().authenticate_bearer(None).expect_err("no header");
        let identity = Identity::new(SubjectId::from(1), Role::User);
        let forbidden =
            require_role(&identity, &[Role::Admin]).expect_err("not an admin");

        assert!(matches!(unauthenticated, AccessError::Unauthenticated { .. }));
        assert!(matches!(forbidden, AccessError::Forbidden(_)));
    }
}
