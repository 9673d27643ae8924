//! Portal user directory ports and application service.
//!
//! Owns credential checks for the login collaborator and provisioning of
//! directory accounts from built-in role templates. Login failures use one
//! generic message so callers cannot tell unknown emails from bad passwords.

use std::sync::Arc;

use async_trait::async_trait;

use partnerdesk_core::{AppResult, UserIdentity};
use partnerdesk_domain::UserId;

use crate::AuditRepository;

mod login;
mod provisioning;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Directory account returned by user lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    /// Unique user identifier.
    pub user_id: UserId,
    /// Canonical lower-cased email address.
    pub email: String,
    /// Display name shown in the portal and used as reviewer attribution.
    pub display_name: String,
    /// Role label, display only.
    pub role: String,
    /// Privilege tokens granted to the account.
    pub privileges: Vec<String>,
    /// Argon2id password hash.
    pub password_hash: String,
}

impl DirectoryUser {
    /// Builds the session identity for this account.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.user_id.to_string(),
            self.display_name.as_str(),
            self.email.as_str(),
            self.role.as_str(),
            self.privileges.iter().cloned(),
        )
    }
}

/// Repository port for directory accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds an account by canonical email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<DirectoryUser>>;

    /// Stores a new account. Returns `Conflict` when the email is taken.
    async fn save_user(&self, user: DirectoryUser) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for provisioning a directory account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionUserInput {
    /// Email address for the new account.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Built-in role template name.
    pub role: String,
    /// Plaintext password.
    pub password: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for portal login and account provisioning.
#[derive(Clone)]
pub struct UserService {
    directory: Arc<dyn UserDirectory>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            directory,
            password_hasher,
            audit_repository,
        }
    }
}
