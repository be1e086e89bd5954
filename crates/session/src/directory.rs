//! Contracts to the relational layer for accounts and roles.
//!
//! The access core does not own user persistence; it consumes it through
//! [`UserDirectory`], the narrow contract the host's repository layer
//! implements. [`MemoryUserDirectory`] is the in-memory reference used in
//! tests and development.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::RwLock;

use folio_access_policy::Role;
use folio_access_store::{StoreError, StoreResult, SubjectId};

/// A stored account row, as the relational layer returns it.
#[derive(Clone, Debug, PartialEq)]
pub struct UserRecord {
    /// Subject identifier.
    pub id: SubjectId,
    /// Unique display name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 digest of the password.
    pub password_digest: String,
    /// The account's single assigned role.
    pub role: Role,
}

impl UserRecord {
    /// Strips credentials, leaving the client-safe profile.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// The subject profile returned to clients; never carries the digest.
#[derive(Clone, Debug, PartialEq)]
pub struct UserProfile {
    /// Subject identifier.
    pub id: SubjectId,
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Assigned role.
    pub role: Role,
}

/// A new account to be created at sign-up.
#[derive(Clone, Debug)]
pub struct NewUser {
    /// Unique display name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 digest of the password.
    pub password_digest: String,
    /// Role assigned at creation.
    pub role: Role,
}

/// Account lookup and creation, implemented by the host's relational
/// layer.
///
/// Lookups return `Ok(None)` for absence. Errors use the store taxonomy:
/// a duplicate email on [`create_user`](Self::create_user) is a
/// [`StoreError::Conflict`], everything else a backend fault.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Creates an account and assigns its subject id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the email or username is already
    /// taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord>;

    /// Returns the account with the given email, or `None`.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Returns the account with the given subject id, or `None`.
    async fn find_by_id(&self, id: SubjectId) -> StoreResult<Option<UserRecord>>;
}

/// In-memory implementation of [`UserDirectory`] for testing.
///
/// Cloning shares the underlying state.
#[derive(Debug, Default, Clone)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<SubjectId, UserRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryUserDirectory {
    /// Creates a new empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut users = self.users.write();

        if users.values().any(|row| row.email == user.email) {
            return Err(StoreError::conflict("email already registered"));
        }
        if users.values().any(|row| row.username == user.username) {
            return Err(StoreError::conflict("username already taken"));
        }

        let record = UserRecord {
            id: SubjectId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1),
            username: user.username,
            email: user.email,
            password_digest: user.password_digest,
            role: user.role,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    #[tracing::instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read();
        Ok(users.values().find(|row| row.email == email).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: SubjectId) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read();
        Ok(users.get(&id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use folio_access_store::assert_store_error;

    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_owned(),
            email: email.to_owned(),
            password_digest: "$argon2id$stub".to_owned(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let directory = MemoryUserDirectory::new();

        let created =
            directory.create_user(new_user("alice", "alice@example.com")).await.expect("create");
        assert_eq!(created.id, SubjectId(1));

        let by_email =
            directory.find_by_email("alice@example.com").await.expect("lookup").expect("found");
        assert_eq!(by_email, created);

        let by_id = directory.find_by_id(created.id).await.expect("lookup").expect("found");
        assert_eq!(by_id, created);
    }

    #[tokio::test]
    async fn test_absent_lookups_are_none() {
        let directory = MemoryUserDirectory::new();

        assert!(directory.find_by_email("ghost@example.com").await.expect("lookup").is_none());
        assert!(directory.find_by_id(SubjectId(404)).await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let directory = MemoryUserDirectory::new();

        directory.create_user(new_user("alice", "alice@example.com")).await.expect("create");
        let result = directory.create_user(new_user("alice2", "alice@example.com")).await;

        assert_store_error!(result, Conflict);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let directory = MemoryUserDirectory::new();

        directory.create_user(new_user("alice", "alice@example.com")).await.expect("create");
        let result = directory.create_user(new_user("alice", "other@example.com")).await;

        assert_store_error!(result, Conflict);
    }

    #[test]
    fn test_profile_strips_digest() {
        let record = UserRecord {
            id: SubjectId(1),
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            password_digest: "$argon2id$secret".to_owned(),
            role: Role::Author,
        };

        let profile = record.profile();
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.role, Role::Author);
        let debug = format!("{profile:?}");
        assert!(!debug.contains("argon2"), "profile must not carry the digest");
    }
}
