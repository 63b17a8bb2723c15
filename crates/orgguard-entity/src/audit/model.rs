//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orgguard_core::types::{AccountId, AuditLogId, OrganizationId};

/// An immutable audit log entry recording an access-relevant action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// The account that performed the action.
    pub account_id: AccountId,
    /// The organization the action was scoped to.
    pub organization_id: OrganizationId,
    /// The action that was performed (e.g. `"api_key.rotate"`).
    pub action: String,
    /// Additional details about the action.
    pub details: serde_json::Value,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The acting account.
    pub account_id: AccountId,
    /// The organization scope.
    pub organization_id: OrganizationId,
    /// The action performed.
    pub action: String,
    /// Additional details. Must never contain secrets.
    pub details: serde_json::Value,
}

/// Recorded actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// Self-service registration.
    AccountRegister,
    /// Founding admin creation.
    OrganizationFound,
    /// Admin-issued account creation.
    AccountCreate,
    /// Account profile change.
    AccountUpdate,
    /// Account deletion.
    AccountDelete,
    /// Organization change.
    OrganizationUpdate,
    /// Organization deletion.
    OrganizationDelete,
    /// API key issued.
    ApiKeyCreate,
    /// API key value replaced.
    ApiKeyRotate,
    /// API key revoked.
    ApiKeyRevoke,
}

impl AuditAction {
    /// Dotted action name stored in the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountRegister => "account.register",
            Self::OrganizationFound => "organization.found",
            Self::AccountCreate => "account.create",
            Self::AccountUpdate => "account.update",
            Self::AccountDelete => "account.delete",
            Self::OrganizationUpdate => "organization.update",
            Self::OrganizationDelete => "organization.delete",
            Self::ApiKeyCreate => "api_key.create",
            Self::ApiKeyRotate => "api_key.rotate",
            Self::ApiKeyRevoke => "api_key.revoke",
        }
    }
}
