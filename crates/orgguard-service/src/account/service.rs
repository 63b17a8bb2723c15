//! Account creation, profile self-service and account administration.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use orgguard_auth::{
    AccessPipeline, IdentityContext, Operation, PasswordHasher, PasswordValidator, RbacEnforcer,
    TenantTarget,
};
use orgguard_core::error::AppError;
use orgguard_core::result::AppResult;
use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_database::AccountStore;
use orgguard_entity::account::{Account, AccountRole, CreateAccount, UpdateAccount, normalize_email};
use orgguard_entity::audit::AuditAction;

use crate::audit::AuditRecorder;

/// Input for creating an account in an organization.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Role to assign; `user` when absent.
    pub role: Option<AccountRole>,
    /// Organization the account joins.
    pub organization_id: OrganizationId,
}

/// Name and email changes.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
}

impl ProfileUpdate {
    fn into_update(self) -> AppResult<UpdateAccount> {
        let name = match self.name {
            Some(n) if n.trim().is_empty() => {
                return Err(AppError::validation("Name cannot be empty"));
            }
            Some(n) => Some(n.trim().to_string()),
            None => None,
        };
        Ok(UpdateAccount {
            name,
            email: self.email.as_deref().map(normalize_email),
        })
    }
}

/// Account operations that require an authenticated caller.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    pipeline: Arc<AccessPipeline>,
    rbac: RbacEnforcer,
    hasher: Arc<PasswordHasher>,
    validator: PasswordValidator,
    audit: AuditRecorder,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        pipeline: Arc<AccessPipeline>,
        hasher: Arc<PasswordHasher>,
        validator: PasswordValidator,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            accounts,
            pipeline,
            rbac: RbacEnforcer::new(),
            hasher,
            validator,
            audit,
        }
    }

    /// Creates an account in the organization named by the request body.
    pub async fn create_user(&self, ctx: &IdentityContext, input: NewUser) -> AppResult<Account> {
        self.pipeline
            .authorize(ctx, Operation::CreateUser, TenantTarget::body(input.organization_id))
            .await?;

        let role = input.role.unwrap_or_default();
        if !self.rbac.can_assign_role(ctx.role, role) {
            return Err(AppError::insufficient_role(format!(
                "A {} cannot create {} accounts",
                ctx.role, role
            )));
        }

        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        self.validator.validate(&input.password)?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let data = CreateAccount::new(name, &input.email, password_hash, role, input.organization_id);
        let account = self.accounts.create(&data).await?;

        info!(
            account_id = %account.id,
            created_by = %ctx.account_id,
            role = %account.role,
            "Account created"
        );
        self.audit
            .record(
                ctx.account_id,
                account.organization_id,
                AuditAction::AccountCreate,
                json!({ "account_id": account.id, "email": account.email, "role": account.role }),
            )
            .await;
        Ok(account)
    }

    /// The caller's own account.
    pub async fn get_profile(&self, ctx: &IdentityContext) -> AppResult<Account> {
        self.pipeline
            .authorize(ctx, Operation::GetOwnProfile, TenantTarget::default())
            .await?;
        self.find(ctx.account_id).await
    }

    /// Changes the caller's own name or email.
    pub async fn update_profile(
        &self,
        ctx: &IdentityContext,
        update: ProfileUpdate,
    ) -> AppResult<Account> {
        self.pipeline
            .authorize(ctx, Operation::UpdateOwnProfile, TenantTarget::default())
            .await?;
        self.apply_update(ctx, ctx.account_id, update).await
    }

    /// Deletes the caller's own account.
    pub async fn delete_profile(&self, ctx: &IdentityContext) -> AppResult<()> {
        self.pipeline
            .authorize(ctx, Operation::DeleteOwnProfile, TenantTarget::default())
            .await?;
        self.remove(ctx, ctx.account_id).await
    }

    /// An account of the caller's organization.
    pub async fn get_account(&self, ctx: &IdentityContext, id: AccountId) -> AppResult<Account> {
        self.pipeline
            .authorize(ctx, Operation::GetAccount, TenantTarget::account(id))
            .await?;
        self.find(id).await
    }

    /// Changes the name or email of an account of the caller's organization.
    pub async fn update_account(
        &self,
        ctx: &IdentityContext,
        id: AccountId,
        update: ProfileUpdate,
    ) -> AppResult<Account> {
        self.pipeline
            .authorize(ctx, Operation::UpdateAccount, TenantTarget::account(id))
            .await?;
        self.apply_update(ctx, id, update).await
    }

    /// Deletes an account of the caller's organization.
    pub async fn delete_account(&self, ctx: &IdentityContext, id: AccountId) -> AppResult<()> {
        self.pipeline
            .authorize(ctx, Operation::DeleteAccount, TenantTarget::account(id))
            .await?;
        self.remove(ctx, id).await
    }

    /// All accounts of an organization, oldest first.
    pub async fn list_organization_users(
        &self,
        ctx: &IdentityContext,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Account>> {
        self.pipeline
            .authorize(
                ctx,
                Operation::ListOrganizationUsers,
                TenantTarget::path(organization_id),
            )
            .await?;
        self.accounts.list_by_organization(organization_id).await
    }

    async fn find(&self, id: AccountId) -> AppResult<Account> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))
    }

    async fn apply_update(
        &self,
        ctx: &IdentityContext,
        id: AccountId,
        update: ProfileUpdate,
    ) -> AppResult<Account> {
        let data = update.into_update()?;
        let account = self
            .accounts
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        self.audit
            .record(
                ctx.account_id,
                account.organization_id,
                AuditAction::AccountUpdate,
                json!({ "account_id": account.id, "name": data.name, "email": data.email }),
            )
            .await;
        Ok(account)
    }

    async fn remove(&self, ctx: &IdentityContext, id: AccountId) -> AppResult<()> {
        if !self.accounts.delete(id).await? {
            return Err(AppError::not_found("Account not found"));
        }
        info!(account_id = %id, deleted_by = %ctx.account_id, "Account deleted");
        self.audit
            .record(
                ctx.account_id,
                ctx.organization_id,
                AuditAction::AccountDelete,
                json!({ "account_id": id }),
            )
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use orgguard_core::ErrorKind;
    use orgguard_entity::api_key::ApiKeyPermission;

    use super::*;
    use crate::testing::{Fixture, via_key};

    fn service(fx: &Fixture) -> AccountService {
        AccountService::new(
            fx.stores.accounts.clone(),
            fx.pipeline(),
            fx.hasher.clone(),
            PasswordValidator::new(&fx.config),
            fx.audit(),
        )
    }

    fn new_user(org: OrganizationId, email: &str, role: Option<AccountRole>) -> NewUser {
        NewUser {
            name: "New".to_string(),
            email: email.to_string(),
            password: "long enough".to_string(),
            role,
            organization_id: org,
        }
    }

    #[tokio::test]
    async fn test_admin_creates_user_in_own_organization() {
        let fx = Fixture::new();
        let (org, admin) = fx.found("admin@a.test").await;

        let account = service(&fx)
            .create_user(&admin, new_user(org.id, "u@a.test", None))
            .await
            .unwrap();
        assert_eq!(account.role, AccountRole::User);
        assert_eq!(account.organization_id, org.id);
    }

    #[tokio::test]
    async fn test_create_user_in_other_organization_denied() {
        let fx = Fixture::new();
        let (_, admin_a) = fx.found("admin@a.test").await;
        let (org_b, _) = fx.found("admin@b.test").await;

        let err = service(&fx)
            .create_user(&admin_a, new_user(org_b.id, "u@b.test", None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::CrossTenantAccessDenied);
        assert!(fx.store.find_by_email("u@b.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_manager_cannot_mint_admin() {
        let fx = Fixture::new();
        let (org, _) = fx.found("admin@a.test").await;
        let manager = fx.member(org.id, "m@a.test", AccountRole::Manager).await;

        let err = service(&fx)
            .create_user(&manager, new_user(org.id, "x@a.test", Some(AccountRole::Admin)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InsufficientRole);
    }

    #[tokio::test]
    async fn test_user_role_cannot_create_accounts() {
        let fx = Fixture::new();
        let (org, _) = fx.found("admin@a.test").await;
        let user = fx.member(org.id, "u@a.test", AccountRole::User).await;

        let err = service(&fx)
            .create_user(&user, new_user(org.id, "x@a.test", None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InsufficientRole);
    }

    #[tokio::test]
    async fn test_read_only_key_cannot_create_accounts() {
        let fx = Fixture::new();
        let (org, admin) = fx.found("admin@a.test").await;
        let key = via_key(&admin, &[ApiKeyPermission::Read]);

        let err = service(&fx)
            .create_user(&key, new_user(org.id, "x@a.test", None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InsufficientPermission);
    }

    #[tokio::test]
    async fn test_profile_update_and_delete() {
        let fx = Fixture::new();
        let (org, _) = fx.found("admin@a.test").await;
        let user = fx.member(org.id, "u@a.test", AccountRole::User).await;
        let svc = service(&fx);

        let updated = svc
            .update_profile(
                &user,
                ProfileUpdate {
                    name: Some("  Renamed ".to_string()),
                    email: Some("New@A.test".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "new@a.test");

        svc.delete_profile(&user).await.unwrap();
        let err = svc.get_profile(&user).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_profile_email_conflict() {
        let fx = Fixture::new();
        let (org, _) = fx.found("admin@a.test").await;
        let user = fx.member(org.id, "u@a.test", AccountRole::User).await;

        let err = service(&fx)
            .update_profile(
                &user,
                ProfileUpdate {
                    email: Some("admin@a.test".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_get_account_across_tenants_denied() {
        let fx = Fixture::new();
        let (_, admin_a) = fx.found("admin@a.test").await;
        let (org_b, _) = fx.found("admin@b.test").await;
        let victim = fx.member(org_b.id, "v@b.test", AccountRole::User).await;

        let err = service(&fx)
            .get_account(&admin_a, victim.account_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::CrossTenantAccessDenied);
    }

    #[tokio::test]
    async fn test_manager_cannot_delete_accounts() {
        let fx = Fixture::new();
        let (org, _) = fx.found("admin@a.test").await;
        let manager = fx.member(org.id, "m@a.test", AccountRole::Manager).await;
        let user = fx.member(org.id, "u@a.test", AccountRole::User).await;

        let err = service(&fx)
            .delete_account(&manager, user.account_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InsufficientRole);
    }

    #[tokio::test]
    async fn test_admin_lists_own_organization_only() {
        let fx = Fixture::new();
        let (org_a, admin_a) = fx.found("admin@a.test").await;
        let (org_b, _) = fx.found("admin@b.test").await;
        fx.member(org_a.id, "u@a.test", AccountRole::User).await;
        let svc = service(&fx);

        let users = svc.list_organization_users(&admin_a, org_a.id).await.unwrap();
        assert_eq!(users.len(), 2);

        let err = svc
            .list_organization_users(&admin_a, org_b.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::CrossTenantAccessDenied);
    }
}
