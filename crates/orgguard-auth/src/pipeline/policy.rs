//! Access policies of the authenticated operations.

use orgguard_entity::account::AccountRole;
use orgguard_entity::api_key::ApiKeyPermission;

use AccountRole::{Admin, Manager, User};
use ApiKeyPermission::{Admin as KeyAdmin, Read, Write};

/// Whose organization an operation is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Acts only on the caller's own organization or account; no target to check.
    Caller,
    /// Addresses an explicit organization or account that must resolve to the caller's.
    Target,
}

/// What an operation requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Roles allowed to perform the operation.
    pub roles: &'static [AccountRole],
    /// Permissions required of API keys. Empty means keys are not narrowed.
    pub permissions: &'static [ApiKeyPermission],
    /// Tenant isolation mode.
    pub tenant: TenantScope,
}

/// Every operation that requires an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Issue an API key.
    CreateApiKey,
    /// List the organization's API keys.
    ListApiKeys,
    /// Replace an API key's value.
    RotateApiKey,
    /// Revoke an API key.
    RevokeApiKey,
    /// Create an account in an organization.
    CreateUser,
    /// Read the caller's account.
    GetOwnProfile,
    /// Change the caller's name or email.
    UpdateOwnProfile,
    /// Delete the caller's account.
    DeleteOwnProfile,
    /// Read an account by id.
    GetAccount,
    /// Change an account by id.
    UpdateAccount,
    /// Delete an account by id.
    DeleteAccount,
    /// List an organization's accounts.
    ListOrganizationUsers,
    /// Read an organization.
    GetOrganization,
    /// Change an organization.
    UpdateOrganization,
    /// Delete an organization.
    DeleteOrganization,
    /// Read an organization's audit trail.
    ListAuditLog,
}

const fn policy(
    roles: &'static [AccountRole],
    permissions: &'static [ApiKeyPermission],
    tenant: TenantScope,
) -> AccessPolicy {
    AccessPolicy {
        roles,
        permissions,
        tenant,
    }
}

impl Operation {
    /// The access policy of this operation.
    pub const fn policy(self) -> AccessPolicy {
        use TenantScope::{Caller, Target};
        match self {
            Self::CreateApiKey | Self::ListApiKeys | Self::RotateApiKey | Self::RevokeApiKey => {
                policy(&[Admin, Manager], &[KeyAdmin], Caller)
            }
            Self::CreateUser => policy(&[Admin, Manager], &[Write], Target),
            Self::GetOwnProfile => policy(&[User, Manager, Admin], &[Read], Caller),
            Self::UpdateOwnProfile | Self::DeleteOwnProfile => {
                policy(&[User, Manager, Admin], &[Write], Caller)
            }
            Self::GetAccount => policy(&[User, Manager, Admin], &[Read], Target),
            Self::UpdateAccount => policy(&[Admin, Manager], &[Write], Target),
            Self::DeleteAccount => policy(&[Admin], &[KeyAdmin], Target),
            Self::ListOrganizationUsers | Self::GetOrganization => {
                policy(&[Admin], &[Read], Target)
            }
            Self::UpdateOrganization => policy(&[Admin], &[Write], Target),
            Self::DeleteOrganization | Self::ListAuditLog => policy(&[Admin], &[KeyAdmin], Target),
        }
    }
}
