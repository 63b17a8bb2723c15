//! Tenant isolation gate: a request may only touch its caller's organization.

use std::sync::Arc;

use tracing::debug;

use orgguard_core::error::AppError;
use orgguard_core::result::AppResult;
use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_database::AccountStore;

use crate::context::IdentityContext;

/// Request-derived hints about which organization is being addressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TenantTarget {
    /// Organization id from the request path.
    pub path_organization: Option<OrganizationId>,
    /// Organization id from the request body.
    pub body_organization: Option<OrganizationId>,
    /// Account addressed by the request.
    pub account: Option<AccountId>,
}

impl TenantTarget {
    /// Target an organization named in the path.
    pub fn path(organization_id: OrganizationId) -> Self {
        Self {
            path_organization: Some(organization_id),
            ..Self::default()
        }
    }

    /// Target an organization named in the body.
    pub fn body(organization_id: OrganizationId) -> Self {
        Self {
            body_organization: Some(organization_id),
            ..Self::default()
        }
    }

    /// Target whichever organization owns `account_id`.
    pub fn account(account_id: AccountId) -> Self {
        Self {
            account: Some(account_id),
            ..Self::default()
        }
    }
}

/// Resolves the targeted organization and compares it with the caller's.
#[derive(Clone)]
pub struct TenantGuard {
    accounts: Arc<dyn AccountStore>,
}

impl std::fmt::Debug for TenantGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantGuard").finish_non_exhaustive()
    }
}

impl TenantGuard {
    /// Create a guard that resolves account targets through `accounts`.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Path id, then body id, then the addressed account's organization.
    pub async fn resolve_target(&self, target: &TenantTarget) -> AppResult<Option<OrganizationId>> {
        if let Some(id) = target.path_organization.or(target.body_organization) {
            return Ok(Some(id));
        }
        let Some(account_id) = target.account else {
            return Ok(None);
        };
        Ok(self
            .accounts
            .find_by_id(account_id)
            .await?
            .map(|account| account.organization_id))
    }

    /// Allow iff the resolved target equals the caller's organization.
    ///
    /// An unresolvable target is denied.
    pub async fn authorize(&self, ctx: &IdentityContext, target: &TenantTarget) -> AppResult<()> {
        match self.resolve_target(target).await? {
            Some(org) if org == ctx.organization_id => Ok(()),
            resolved => {
                debug!(
                    caller_org = %ctx.organization_id,
                    target_org = ?resolved,
                    "Cross-tenant access denied"
                );
                Err(AppError::cross_tenant("Access to this organization is not allowed"))
            }
        }
    }
}
