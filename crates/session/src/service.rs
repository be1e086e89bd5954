//! Sign-up, login, refresh rotation and logout.

use std::sync::Arc;

use chrono::Utc;

use folio_access_authn::TokenAuthority;
use folio_access_policy::Role;
use folio_access_store::{CredentialStore, RefreshCredential, StoreError};

use crate::{
    directory::{NewUser, UserDirectory, UserProfile, UserRecord},
    error::{AccessError, UnauthenticatedReason},
    password,
};

/// Where a request came from, recorded on the refresh-credential row.
#[derive(Clone, Debug, Default)]
pub struct ClientOrigin {
    /// Client source address.
    pub ip: String,
    /// Client user agent.
    pub user_agent: String,
}

/// Input to [`SessionService::sign_up`].
#[derive(Clone, Debug)]
pub struct SignUpRequest {
    /// Desired unique display name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Plaintext password; digested before it goes anywhere.
    pub password: String,
    /// Request origin, recorded on the credential row.
    pub origin: ClientOrigin,
}

/// Input to [`SessionService::login`].
#[derive(Clone, Debug)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Request origin, recorded on the credential row.
    pub origin: ClientOrigin,
}

/// An authenticated session: the profile plus both credential strings.
#[derive(Clone, Debug)]
pub struct AuthenticatedSession {
    /// Client-safe subject profile.
    pub user: UserProfile,
    /// Short-lived access credential.
    pub access_token: String,
    /// Longer-lived refresh credential.
    pub refresh_token: String,
}

/// Result of a refresh rotation: a fresh pair.
#[derive(Clone, Debug)]
pub struct RotatedTokens {
    /// Fresh access credential.
    pub access_token: String,
    /// The rotated refresh credential (same row, new value).
    pub refresh_token: String,
}

/// The session flows the HTTP boundary calls into.
///
/// Composes the token authority, the credential store and the user
/// directory. One instance is shared across all request workers.
#[derive(Clone)]
pub struct SessionService {
    authority: TokenAuthority,
    credentials: Arc<dyn CredentialStore>,
    directory: Arc<dyn UserDirectory>,
}

impl SessionService {
    /// Creates the service from its collaborators.
    #[must_use]
    pub fn new(
        authority: TokenAuthority,
        credentials: Arc<dyn CredentialStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self { authority, credentials, directory }
    }

    /// Registers a new account and issues its first credential pair.
    ///
    /// The account gets the default `user` role. The refresh credential is
    /// persisted with the request origin.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Conflict`] when the email or username is taken
    /// - [`AccessError::Internal`] on directory, store or signing faults
    #[tracing::instrument(skip_all, fields(email = %request.email))]
    pub async fn sign_up(
        &self,
        request: SignUpRequest,
    ) -> Result<AuthenticatedSession, AccessError> {
        let digest = password::hash_password(&request.password)?;

        let user = self
            .directory
            .create_user(NewUser {
                username: request.username,
                email: request.email,
                password_digest: digest,
                role: Role::User,
            })
            .await
            .map_err(conflict_or_internal)?;

        tracing::info!(subject = %user.id, "account created");
        self.issue_session(&user, &request.origin).await
    }

    /// Authenticates an account and returns a credential pair.
    ///
    /// If an active, unexpired refresh credential already exists for the
    /// subject, its token value is returned unchanged (with its original
    /// expiry) paired with a freshly reissued access credential. No
    /// duplicate row is created for repeated logins. Otherwise a new pair
    /// is issued and persisted.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Unauthenticated`] when the email is unknown or the password does not match
    ///   (indistinguishable on the wire)
    /// - [`AccessError::Internal`] on backend faults
    #[tracing::instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthenticatedSession, AccessError> {
        let user = self
            .directory
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AccessError::unauthenticated(UnauthenticatedReason::BadCredentials))?;

        if !password::verify_password(&request.password, &user.password_digest) {
            tracing::warn!(subject = %user.id, "failed login attempt");
            return Err(AccessError::unauthenticated(UnauthenticatedReason::BadCredentials));
        }

        if let Some(existing) = self.credentials.get_active_by_subject(user.id).await? {
            // Reuse the canonical active credential rather than piling up
            // rows; it keeps its original expiry.
            let access = self.authority.reissue_access(user.id, user.role.as_str())?;
            tracing::debug!(subject = %user.id, "reusing active refresh credential");
            return Ok(AuthenticatedSession {
                user: user.profile(),
                access_token: access.token,
                refresh_token: existing.token,
            });
        }

        self.issue_session(&user, &request.origin).await
    }

    /// Exchanges a refresh credential for a fresh pair, rotating in place.
    ///
    /// The presented token must verify cryptographically *and* have a live
    /// row in the store. The row keeps its id: the token value and expiry
    /// are replaced, which invalidates the old value for any future
    /// rotation or lookup.
    ///
    /// # Errors
    ///
    /// [`AccessError::Unauthenticated`] for a malformed, expired, unknown
    /// or revoked credential (all identical on the wire), and
    /// [`AccessError::Internal`] on backend faults.
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<RotatedTokens, AccessError> {
        let claims = self.authority.verify_refresh(refresh_token)?;

        let mut row = self
            .credentials
            .get_by_token(refresh_token)
            .await?
            .ok_or_else(|| {
                AccessError::unauthenticated(UnauthenticatedReason::UnknownCredential)
            })?;

        let now = Utc::now();
        if row.revoked {
            tracing::debug!(subject = %row.subject_id, "refresh attempt with revoked credential");
            return Err(AccessError::unauthenticated(UnauthenticatedReason::Revoked));
        }
        if row.is_expired(now) {
            return Err(AccessError::unauthenticated(UnauthenticatedReason::Expired));
        }

        let user = self
            .directory
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                // The account vanished under a live credential.
                AccessError::unauthenticated(UnauthenticatedReason::UnknownCredential)
            })?;

        let rotated = self.authority.issue_refresh(user.id)?;
        row.token = rotated.token;
        row.expires_at = rotated.expires_at;
        row.updated_at = now;
        self.credentials.update(&row).await?;

        let access = self.authority.issue_access(user.id, user.role.as_str())?;
        tracing::info!(subject = %user.id, "refresh credential rotated");

        Ok(RotatedTokens { access_token: access.token, refresh_token: row.token })
    }

    /// Revokes the refresh credential, ending the session.
    ///
    /// Idempotent: revoking an already-revoked credential succeeds. The
    /// row is kept (flag only) until the expiry sweep removes it.
    ///
    /// # Errors
    ///
    /// [`AccessError::Unauthenticated`] when the token value has no row,
    /// surfaced exactly like an expired credential, and
    /// [`AccessError::Internal`] on backend faults.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AccessError> {
        let mut row = self
            .credentials
            .get_by_token(refresh_token)
            .await?
            .ok_or_else(|| {
                AccessError::unauthenticated(UnauthenticatedReason::UnknownCredential)
            })?;

        if !row.revoked {
            row.revoked = true;
            row.updated_at = Utc::now();
            self.credentials.update(&row).await?;
            tracing::info!(subject = %row.subject_id, "refresh credential revoked");
        }

        Ok(())
    }

    /// Issues and persists a brand-new credential pair for the user.
    async fn issue_session(
        &self,
        user: &UserRecord,
        origin: &ClientOrigin,
    ) -> Result<AuthenticatedSession, AccessError> {
        let access = self.authority.issue_access(user.id, user.role.as_str())?;
        let refresh = self.authority.issue_refresh(user.id)?;

        let row = RefreshCredential::builder()
            .subject_id(user.id)
            .token(refresh.token.clone())
            .origin_ip(origin.ip.clone())
            .origin_user_agent(origin.user_agent.clone())
            .expires_at(refresh.expires_at)
            .build();
        self.credentials.create(row).await?;

        Ok(AuthenticatedSession {
            user: user.profile(),
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }
}

fn conflict_or_internal(err: StoreError) -> AccessError {
    match err {
        StoreError::Conflict { message } => AccessError::Conflict(message),
        other => AccessError::internal(other),
    }
}
