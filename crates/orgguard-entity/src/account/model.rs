//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orgguard_core::types::{AccountId, OrganizationId};

use super::role::AccountRole;

/// A human principal belonging to one organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Unique, lowercase email address.
    pub email: String,
    /// Argon2 password hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Account role (RBAC).
    pub role: AccountRole,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new account.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    /// Display name.
    pub name: String,
    /// Email address (normalized to lowercase by [`CreateAccount::new`]).
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: AccountRole,
    /// Owning organization.
    pub organization_id: OrganizationId,
}

impl CreateAccount {
    /// Build creation data, normalizing the email.
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password_hash: String,
        role: AccountRole,
        organization_id: OrganizationId,
    ) -> Self {
        Self {
            name: name.into(),
            email: normalize_email(email),
            password_hash,
            role,
            organization_id,
        }
    }
}

/// Data for updating an account's profile.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    /// New display name.
    pub name: Option<String>,
    /// New email address (already normalized).
    pub email: Option<String>,
}

/// Lowercase and trim an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
