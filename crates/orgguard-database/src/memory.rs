//! In-memory implementation of every store trait.
//!
//! Reads go straight to the `DashMap`s. Writes that must uphold a
//! uniqueness rule or a conditional claim serialize on `write_lock`, which
//! gives the same guarantees the PostgreSQL constraints give.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use orgguard_core::error::AppError;
use orgguard_core::result::AppResult;
use orgguard_core::types::{AccountId, ApiKeyId, AuditLogId, OrganizationId};
use orgguard_entity::account::{Account, AccountRole, CreateAccount, UpdateAccount};
use orgguard_entity::api_key::{ApiKey, CreateApiKey};
use orgguard_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use orgguard_entity::organization::{Organization, UpdateOrganization};

use crate::store::{
    AccountStore, ApiKeyStore, AuditLogStore, FoundingAdmin, OrganizationStore, StoreHealth,
};

/// Process-local store backed by concurrent maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    accounts: Arc<DashMap<AccountId, Account>>,
    organizations: Arc<DashMap<OrganizationId, Organization>>,
    api_keys: Arc<DashMap<ApiKeyId, ApiKey>>,
    audit: Arc<DashMap<AuditLogId, AuditLogEntry>>,
    write_lock: Arc<Mutex<()>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an organization directly. Used to seed fixtures.
    pub async fn insert_organization(&self, organization: Organization) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.ensure_org_name_free(&organization.name, organization.id)?;
        self.organizations.insert(organization.id, organization);
        Ok(())
    }

    fn ensure_email_free(&self, email: &str, except: Option<AccountId>) -> AppResult<()> {
        let taken = self
            .accounts
            .iter()
            .any(|a| a.email == email && Some(a.id) != except);
        if taken {
            return Err(AppError::conflict("Email already in use"));
        }
        Ok(())
    }

    fn ensure_org_name_free(&self, name: &str, except: OrganizationId) -> AppResult<()> {
        let taken = self
            .organizations
            .iter()
            .any(|o| o.name == name && o.id != except);
        if taken {
            return Err(AppError::conflict("Organization name already in use"));
        }
        Ok(())
    }

    fn key_in_use(&self, key: &str) -> bool {
        self.api_keys.iter().any(|k| k.key == key)
    }

    fn new_account(data: &CreateAccount, now: DateTime<Utc>) -> Account {
        Account {
            id: AccountId::new(),
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            organization_id: data.organization_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let email = email.to_lowercase();
        Ok(self
            .accounts
            .iter()
            .find(|a| a.email == email)
            .map(|a| a.clone()))
    }

    async fn list_by_organization(&self, organization_id: OrganizationId) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|a| a.organization_id == organization_id)
            .map(|a| a.clone())
            .collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        let _guard = self.write_lock.lock().await;
        if !self.organizations.contains_key(&data.organization_id) {
            return Err(AppError::not_found("Organization not found"));
        }
        self.ensure_email_free(&data.email, None)?;
        let account = Self::new_account(data, Utc::now());
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, id: AccountId, data: &UpdateAccount) -> AppResult<Option<Account>> {
        let _guard = self.write_lock.lock().await;
        if let Some(email) = &data.email {
            self.ensure_email_free(email, Some(id))?;
        }
        let Some(mut account) = self.accounts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &data.name {
            account.name = name.clone();
        }
        if let Some(email) = &data.email {
            account.email = email.clone();
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn delete(&self, id: AccountId) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let removed = self.accounts.remove(&id).is_some();
        if removed {
            let now = Utc::now();
            for mut key in self.api_keys.iter_mut() {
                if key.created_by == id && key.is_active {
                    key.is_active = false;
                    key.revoked_at = Some(now);
                    key.updated_at = now;
                }
            }
            for mut org in self.organizations.iter_mut() {
                if org.founded_by == Some(id) {
                    org.founded_by = None;
                }
            }
        }
        Ok(removed)
    }

    async fn create_founding_admin(
        &self,
        data: &FoundingAdmin,
    ) -> AppResult<(Organization, Account)> {
        let _guard = self.write_lock.lock().await;
        let now = Utc::now();

        let existing = self.organizations.get(&data.organization_id).map(|o| o.clone());
        if let Some(org) = &existing {
            let has_accounts = self
                .accounts
                .iter()
                .any(|a| a.organization_id == org.id);
            if org.is_founded() || has_accounts {
                return Err(AppError::first_user_exists(
                    "Organization already has a founding admin",
                ));
            }
        } else {
            self.ensure_org_name_free(&data.organization_name, data.organization_id)?;
        }
        self.ensure_email_free(&data.email, None)?;

        let account = Self::new_account(
            &CreateAccount {
                name: data.name.clone(),
                email: data.email.clone(),
                password_hash: data.password_hash.clone(),
                role: AccountRole::Admin,
                organization_id: data.organization_id,
            },
            now,
        );
        let mut organization = existing.unwrap_or_else(|| Organization {
            id: data.organization_id,
            name: data.organization_name.clone(),
            address: data.organization_address.clone(),
            is_active: true,
            founded_by: None,
            created_at: now,
            updated_at: now,
        });
        organization.founded_by = Some(account.id);
        organization.updated_at = now;

        self.organizations.insert(organization.id, organization.clone());
        self.accounts.insert(account.id, account.clone());
        Ok((organization, account))
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn find_by_id(&self, id: OrganizationId) -> AppResult<Option<Organization>> {
        Ok(self.organizations.get(&id).map(|o| o.clone()))
    }

    async fn update(
        &self,
        id: OrganizationId,
        data: &UpdateOrganization,
    ) -> AppResult<Option<Organization>> {
        let _guard = self.write_lock.lock().await;
        if let Some(name) = &data.name {
            self.ensure_org_name_free(name, id)?;
        }
        let Some(mut org) = self.organizations.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &data.name {
            org.name = name.clone();
        }
        if let Some(address) = &data.address {
            org.address = address.clone();
        }
        if let Some(is_active) = data.is_active {
            org.is_active = is_active;
        }
        org.updated_at = Utc::now();
        Ok(Some(org.clone()))
    }

    async fn delete(&self, id: OrganizationId) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let removed = self.organizations.remove(&id).is_some();
        if removed {
            self.accounts.retain(|_, a| a.organization_id != id);
            self.api_keys.retain(|_, k| k.organization_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ApiKeyStore for MemoryStore {
    async fn create(&self, data: &CreateApiKey) -> AppResult<ApiKey> {
        let _guard = self.write_lock.lock().await;
        if !self.organizations.contains_key(&data.organization_id) {
            return Err(AppError::not_found("Organization not found"));
        }
        if self.key_in_use(&data.key) {
            return Err(AppError::conflict("API key value collision"));
        }
        let now = Utc::now();
        let key = ApiKey {
            id: ApiKeyId::new(),
            key: data.key.clone(),
            organization_id: data.organization_id,
            created_by: data.created_by,
            name: data.name.clone(),
            permissions: data.permissions.clone(),
            last_used_at: None,
            expires_at: data.expires_at,
            is_active: true,
            revoked_at: None,
            created_at: now,
            updated_at: now,
        };
        self.api_keys.insert(key.id, key.clone());
        Ok(key)
    }

    async fn find_active_by_key(&self, key: &str) -> AppResult<Option<ApiKey>> {
        Ok(self
            .api_keys
            .iter()
            .find(|k| k.is_active && k.key == key)
            .map(|k| k.clone()))
    }

    async fn list_active(&self, organization_id: OrganizationId) -> AppResult<Vec<ApiKey>> {
        let mut keys: Vec<ApiKey> = self
            .api_keys
            .iter()
            .filter(|k| k.is_active && k.organization_id == organization_id)
            .map(|k| k.clone())
            .collect();
        keys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(keys)
    }

    async fn rotate(
        &self,
        id: ApiKeyId,
        organization_id: OrganizationId,
        new_key: &str,
    ) -> AppResult<Option<ApiKey>> {
        let _guard = self.write_lock.lock().await;
        if self.key_in_use(new_key) {
            return Err(AppError::conflict("API key value collision"));
        }
        let Some(mut key) = self.api_keys.get_mut(&id) else {
            return Ok(None);
        };
        if !key.is_active || key.organization_id != organization_id {
            return Ok(None);
        }
        key.key = new_key.to_string();
        key.last_used_at = None;
        key.updated_at = Utc::now();
        Ok(Some(key.clone()))
    }

    async fn revoke(
        &self,
        id: ApiKeyId,
        organization_id: OrganizationId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ApiKey>> {
        let _guard = self.write_lock.lock().await;
        let Some(mut key) = self.api_keys.get_mut(&id) else {
            return Ok(None);
        };
        if !key.is_active || key.organization_id != organization_id {
            return Ok(None);
        }
        key.is_active = false;
        key.revoked_at = Some(at);
        key.updated_at = at;
        Ok(Some(key.clone()))
    }

    async fn touch_last_used(&self, id: ApiKeyId, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(mut key) = self.api_keys.get_mut(&id) {
            key.last_used_at = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let record = AuditLogEntry {
            id: AuditLogId::new(),
            account_id: entry.account_id,
            organization_id: entry.organization_id,
            action: entry.action.clone(),
            details: entry.details.clone(),
            created_at: Utc::now(),
        };
        self.audit.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
        limit: i64,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .audit
            .iter()
            .filter(|e| e.organization_id == organization_id)
            .map(|e| e.clone())
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(entries)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
