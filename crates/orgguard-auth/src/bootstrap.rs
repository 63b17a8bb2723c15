//! Founding-admin policy.
//!
//! The first account of an organization becomes its admin. Whether an
//! account is first is decided by the store inside one atomic step, never
//! by a separate count.

use std::sync::Arc;

use tracing::info;

use orgguard_core::result::AppResult;
use orgguard_core::types::OrganizationId;
use orgguard_database::{AccountStore, FoundingAdmin};
use orgguard_entity::account::{Account, normalize_email};
use orgguard_entity::organization::Organization;

/// A request to become the founding admin of an organization.
#[derive(Debug, Clone)]
pub struct FoundingRequest {
    /// Organization to found or claim.
    pub organization_id: OrganizationId,
    /// Name for a newly created organization; defaults to `org-{id}`.
    pub organization_name: Option<String>,
    /// Address for a newly created organization.
    pub organization_address: Option<String>,
    /// Display name of the admin.
    pub name: String,
    /// Email of the admin.
    pub email: String,
    /// Hash of the admin's password.
    pub password_hash: String,
}

/// Default name given to an organization created by its founder.
pub fn default_organization_name(id: OrganizationId) -> String {
    format!("org-{id}")
}

/// Creates founding admins.
#[derive(Clone)]
pub struct BootstrapPolicy {
    accounts: Arc<dyn AccountStore>,
}

impl std::fmt::Debug for BootstrapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapPolicy").finish_non_exhaustive()
    }
}

impl BootstrapPolicy {
    /// Create the policy over an account store.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Create the admin and, if needed, the organization.
    ///
    /// Fails with `FirstUserAlreadyExists` when the organization already
    /// has a founder or any account.
    pub async fn found(&self, request: FoundingRequest) -> AppResult<(Organization, Account)> {
        let organization_name = request
            .organization_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_organization_name(request.organization_id));

        let data = FoundingAdmin {
            organization_id: request.organization_id,
            organization_name,
            organization_address: request.organization_address.unwrap_or_default(),
            name: request.name,
            email: normalize_email(&request.email),
            password_hash: request.password_hash,
        };

        let (organization, account) = self.accounts.create_founding_admin(&data).await?;
        info!(
            organization_id = %organization.id,
            account_id = %account.id,
            "Founding admin created"
        );
        Ok((organization, account))
    }
}
