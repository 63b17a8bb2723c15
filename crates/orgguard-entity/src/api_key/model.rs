//! API key entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orgguard_core::types::{AccountId, ApiKeyId, OrganizationId};

use super::permission::ApiKeyPermission;

/// Number of key characters exposed in listings and logs.
pub const KEY_PREFIX_LEN: usize = 12;

/// A long-lived machine credential scoped to one organization.
///
/// The full `key` value is serialized only in creation and rotation
/// responses; listings use [`ApiKeySummary`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiKey {
    /// Record identifier. Stable across rotations.
    pub id: ApiKeyId,
    /// Opaque key value (lowercase hex).
    pub key: String,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Account that created the key.
    pub created_by: AccountId,
    /// Human-readable name.
    pub name: String,
    /// Granted permissions.
    pub permissions: Vec<ApiKeyPermission>,
    /// Last successful authentication with this key.
    pub last_used_at: Option<DateTime<Utc>>,
    /// Expiry; `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Cleared on revocation and never set again.
    pub is_active: bool,
    /// When the key was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// When the key was created.
    pub created_at: DateTime<Utc>,
    /// When the key was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Whether the key has passed its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// The truncated, display-safe form of the key value.
    pub fn key_prefix(&self) -> String {
        key_prefix(&self.key)
    }

    /// Build the listing view of this key.
    pub fn summary(&self) -> ApiKeySummary {
        ApiKeySummary {
            id: self.id,
            name: self.name.clone(),
            key_prefix: self.key_prefix(),
            permissions: self.permissions.clone(),
            created_by: self.created_by,
            last_used_at: self.last_used_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

/// Listing view of an API key. Never carries the full key value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeySummary {
    /// Record identifier.
    pub id: ApiKeyId,
    /// Human-readable name.
    pub name: String,
    /// First characters of the key followed by `...`.
    pub key_prefix: String,
    /// Granted permissions.
    pub permissions: Vec<ApiKeyPermission>,
    /// Account that created the key.
    pub created_by: AccountId,
    /// Last successful authentication with this key.
    pub last_used_at: Option<DateTime<Utc>>,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the key was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a new API key.
#[derive(Debug, Clone)]
pub struct CreateApiKey {
    /// Freshly generated key value.
    pub key: String,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Creating account.
    pub created_by: AccountId,
    /// Human-readable name.
    pub name: String,
    /// Granted permissions.
    pub permissions: Vec<ApiKeyPermission>,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Returned by a successful revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationReceipt {
    /// The revoked key's record identifier.
    pub id: ApiKeyId,
    /// Human-readable name of the revoked key.
    pub name: String,
    /// When the revocation took effect.
    pub revoked_at: DateTime<Utc>,
}

/// Truncate a key value for display: first [`KEY_PREFIX_LEN`] characters plus `...`.
pub fn key_prefix(key: &str) -> String {
    let head: String = key.chars().take(KEY_PREFIX_LEN).collect();
    format!("{head}...")
}
