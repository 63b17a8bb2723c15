//! Shared fixtures for service tests.

use std::sync::Arc;

use orgguard_auth::{AccessPipeline, IdentityContext, PasswordHasher};
use orgguard_core::config::AuthConfig;
use orgguard_core::types::{ApiKeyId, OrganizationId};
use orgguard_database::{AccountStore, FoundingAdmin, MemoryStore, Stores};
use orgguard_entity::account::{AccountRole, CreateAccount};
use orgguard_entity::api_key::ApiKeyPermission;
use orgguard_entity::organization::Organization;

use crate::audit::AuditRecorder;

pub(crate) struct Fixture {
    pub store: MemoryStore,
    pub stores: Stores,
    pub config: AuthConfig,
    pub hasher: Arc<PasswordHasher>,
}

impl Fixture {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        Self {
            stores: Stores::memory(store.clone()),
            store,
            config: AuthConfig {
                jwt_secret: "service-test-secret".to_string(),
                ..AuthConfig::default()
            },
            hasher: Arc::new(PasswordHasher::new()),
        }
    }

    pub fn pipeline(&self) -> Arc<AccessPipeline> {
        Arc::new(AccessPipeline::standard(self.stores.accounts.clone()))
    }

    pub fn audit(&self) -> AuditRecorder {
        AuditRecorder::new(self.stores.audit.clone())
    }

    /// Founds a fresh organization and returns its admin's session context.
    pub async fn found(&self, email: &str) -> (Organization, IdentityContext) {
        let (org, admin) = self
            .store
            .create_founding_admin(&FoundingAdmin {
                organization_id: OrganizationId::new(),
                organization_name: format!("org-{email}"),
                organization_address: String::new(),
                name: "Founder".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let ctx = session(&admin);
        (org, ctx)
    }

    /// Adds an account to `org` and returns its session context.
    pub async fn member(
        &self,
        org: OrganizationId,
        email: &str,
        role: AccountRole,
    ) -> IdentityContext {
        let account = AccountStore::create(
            &self.store,
            &CreateAccount::new("Member", email, "hash".to_string(), role, org),
        )
        .await
        .unwrap();
        session(&account)
    }
}

pub(crate) fn session(account: &orgguard_entity::account::Account) -> IdentityContext {
    IdentityContext {
        account_id: account.id,
        organization_id: account.organization_id,
        role: account.role,
        permissions: None,
        api_key_id: None,
    }
}

/// The same caller acting through an API key with the given permissions.
pub(crate) fn via_key(ctx: &IdentityContext, permissions: &[ApiKeyPermission]) -> IdentityContext {
    IdentityContext {
        role: AccountRole::Admin,
        permissions: Some(permissions.to_vec()),
        api_key_id: Some(ApiKeyId::new()),
        ..ctx.clone()
    }
}
