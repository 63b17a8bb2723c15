//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use orgguard_core::types::OrganizationId;
use orgguard_entity::account::AccountRole;

/// Self-registration into an existing organization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    /// Password. Length policy is enforced by the service.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Organization to join.
    pub organization_id: OrganizationId,
}

/// Founding-admin registration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterFounderRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Organization to found.
    pub organization_id: OrganizationId,
    /// Name for the new organization.
    #[validate(length(min = 1, max = 100))]
    pub organization_name: Option<String>,
    /// Address for the new organization.
    #[validate(length(max = 255))]
    pub organization_address: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create user request (admin or manager).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Defaults to `user`.
    pub role: Option<AccountRole>,
    pub organization_id: OrganizationId,
}

/// Name/email change for an account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
}

/// Organization update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

/// API key issue request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApiKeyRequest {
    /// Key name, 3 to 50 characters.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Any of `read`, `write`, `admin`. Defaults to `read`.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Audit log listing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogQuery {
    /// Maximum entries to return (default: 50).
    #[serde(default = "default_audit_limit")]
    pub limit: i64,
}

fn default_audit_limit() -> i64 {
    50
}
