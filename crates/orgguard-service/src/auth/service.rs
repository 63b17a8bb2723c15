//! Self-registration, founding-admin registration and password login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use orgguard_auth::{
    BootstrapPolicy, FoundingRequest, JwtEncoder, PasswordHasher, PasswordValidator,
};
use orgguard_core::error::AppError;
use orgguard_core::result::AppResult;
use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_database::{AccountStore, OrganizationStore};
use orgguard_entity::account::{Account, AccountRole, CreateAccount, normalize_email};
use orgguard_entity::audit::AuditAction;
use orgguard_entity::organization::Organization;

use crate::audit::AuditRecorder;

/// Generic login failure; never reveals which half of the pair was wrong.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Input for creating an account without an authenticated caller.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Email address; normalized before storage.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Organization to join or found.
    pub organization_id: OrganizationId,
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Signed session token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Authenticated account.
    pub account_id: AccountId,
    /// Role captured in the token.
    pub role: AccountRole,
    /// Organization captured in the token.
    pub organization_id: OrganizationId,
}

/// Unauthenticated entry points: register, found, log in.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    organizations: Arc<dyn OrganizationStore>,
    bootstrap: BootstrapPolicy,
    hasher: Arc<PasswordHasher>,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    audit: AuditRecorder,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        organizations: Arc<dyn OrganizationStore>,
        hasher: Arc<PasswordHasher>,
        validator: PasswordValidator,
        encoder: JwtEncoder,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            bootstrap: BootstrapPolicy::new(accounts.clone()),
            accounts,
            organizations,
            hasher,
            validator,
            encoder,
            audit,
        }
    }

    /// Creates a `user` account in an existing organization.
    pub async fn register(&self, registration: Registration) -> AppResult<Account> {
        let name = required_name(&registration.name)?;
        self.validator.validate(&registration.password)?;
        let password_hash = self.hasher.hash_password(&registration.password)?;

        let data = CreateAccount::new(
            name,
            &registration.email,
            password_hash,
            AccountRole::User,
            registration.organization_id,
        );
        let account = self.accounts.create(&data).await?;

        info!(account_id = %account.id, organization_id = %account.organization_id, "Account registered");
        self.audit
            .record(
                account.id,
                account.organization_id,
                AuditAction::AccountRegister,
                json!({ "email": account.email }),
            )
            .await;
        Ok(account)
    }

    /// Creates the founding admin of an organization, creating the
    /// organization too when it does not exist yet.
    pub async fn register_founder(
        &self,
        registration: Registration,
        organization_name: Option<String>,
        organization_address: Option<String>,
    ) -> AppResult<(Organization, Account)> {
        let name = required_name(&registration.name)?;
        self.validator.validate(&registration.password)?;
        let password_hash = self.hasher.hash_password(&registration.password)?;

        let (organization, account) = self
            .bootstrap
            .found(FoundingRequest {
                organization_id: registration.organization_id,
                organization_name,
                organization_address,
                name,
                email: registration.email,
                password_hash,
            })
            .await?;

        self.audit
            .record(
                account.id,
                organization.id,
                AuditAction::OrganizationFound,
                json!({ "email": account.email, "organization_name": organization.name }),
            )
            .await;
        Ok((organization, account))
    }

    /// Verifies an email/password pair and issues a session token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let email = normalize_email(email);
        let Some(account) = self.accounts.find_by_email(&email).await? else {
            self.hasher.verify_dummy(password);
            warn!("Login failed");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &account.password_hash) {
            warn!(account_id = %account.id, "Login failed");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        let organization = self
            .organizations
            .find_by_id(account.organization_id)
            .await?
            .ok_or_else(|| AppError::unauthenticated(INVALID_CREDENTIALS))?;
        if !organization.is_active {
            return Err(AppError::organization_inactive("Organization is inactive"));
        }

        let issued = self
            .encoder
            .issue(account.id, account.role, account.organization_id)?;

        info!(account_id = %account.id, role = %account.role, "Login succeeded");
        Ok(LoginResult {
            token: issued.token,
            expires_at: issued.expires_at,
            account_id: account.id,
            role: account.role,
            organization_id: account.organization_id,
        })
    }
}

fn required_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    Ok(name.to_string())
}
