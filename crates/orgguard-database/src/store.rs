//! Store traits consumed by the access-control and service layers.
//!
//! Every mutation is either a unique-constrained insert or a single
//! conditional update, so implementations never need a read-modify-write
//! cycle outside of the founding-admin claim.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orgguard_core::config::DatabaseConfig;
use orgguard_core::result::AppResult;
use orgguard_core::types::{AccountId, ApiKeyId, OrganizationId};
use orgguard_entity::account::{Account, CreateAccount, UpdateAccount};
use orgguard_entity::api_key::{ApiKey, CreateApiKey};
use orgguard_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use orgguard_entity::organization::{Organization, UpdateOrganization};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    AccountRepository, ApiKeyRepository, AuditLogRepository, OrganizationRepository,
};

/// Input for the founding-admin transaction.
#[derive(Debug, Clone)]
pub struct FoundingAdmin {
    /// Organization being founded (or claimed, if it exists unfounded).
    pub organization_id: OrganizationId,
    /// Name used when the organization has to be created.
    pub organization_name: String,
    /// Address used when the organization has to be created.
    pub organization_address: String,
    /// Display name of the admin.
    pub name: String,
    /// Normalized email of the admin.
    pub email: String,
    /// Hash of the admin's password.
    pub password_hash: String,
}

/// Persistence of accounts.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Find an account by id.
    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>>;

    /// Find an account by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// List the accounts of an organization, oldest first.
    async fn list_by_organization(&self, organization_id: OrganizationId) -> AppResult<Vec<Account>>;

    /// Insert an account. Fails with `Conflict` when the email is taken and
    /// `NotFound` when the organization does not exist.
    async fn create(&self, data: &CreateAccount) -> AppResult<Account>;

    /// Update name/email. Returns `None` when the account does not exist.
    async fn update(&self, id: AccountId, data: &UpdateAccount) -> AppResult<Option<Account>>;

    /// Delete an account. Returns whether a row was removed.
    ///
    /// Keys the account created are revoked, not removed.
    async fn delete(&self, id: AccountId) -> AppResult<bool>;

    /// Atomically create the founding admin of an organization.
    ///
    /// Creates the organization when it does not exist. When it exists, the
    /// claim succeeds only if no founder is recorded and it has no accounts.
    /// Otherwise fails with `FirstUserAlreadyExists`.
    async fn create_founding_admin(&self, data: &FoundingAdmin)
    -> AppResult<(Organization, Account)>;
}

/// Persistence of organizations.
#[async_trait]
pub trait OrganizationStore: Send + Sync + 'static {
    /// Find an organization by id.
    async fn find_by_id(&self, id: OrganizationId) -> AppResult<Option<Organization>>;

    /// Update an organization. Returns `None` when it does not exist.
    async fn update(
        &self,
        id: OrganizationId,
        data: &UpdateOrganization,
    ) -> AppResult<Option<Organization>>;

    /// Delete an organization together with its accounts and keys.
    ///
    /// The audit trail is retained.
    async fn delete(&self, id: OrganizationId) -> AppResult<bool>;
}

/// Persistence of API keys.
#[async_trait]
pub trait ApiKeyStore: Send + Sync + 'static {
    /// Insert a key. Fails with `Conflict` when the key value collides.
    async fn create(&self, data: &CreateApiKey) -> AppResult<ApiKey>;

    /// Find an active key by its exact value.
    async fn find_active_by_key(&self, key: &str) -> AppResult<Option<ApiKey>>;

    /// List the active keys of an organization, newest first.
    async fn list_active(&self, organization_id: OrganizationId) -> AppResult<Vec<ApiKey>>;

    /// Replace the value of an active key and clear its last-used stamp.
    ///
    /// Returns `None` when no active key with that id exists in the
    /// organization. Fails with `Conflict` when `new_key` collides.
    async fn rotate(
        &self,
        id: ApiKeyId,
        organization_id: OrganizationId,
        new_key: &str,
    ) -> AppResult<Option<ApiKey>>;

    /// Deactivate an active key. Returns `None` when no active key matches.
    async fn revoke(
        &self,
        id: ApiKeyId,
        organization_id: OrganizationId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ApiKey>>;

    /// Record a successful authentication with the key.
    async fn touch_last_used(&self, id: ApiKeyId, at: DateTime<Utc>) -> AppResult<()>;
}

/// Persistence of the audit trail.
#[async_trait]
pub trait AuditLogStore: Send + Sync + 'static {
    /// Append an entry.
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Most recent entries of an organization, newest first.
    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
        limit: i64,
    ) -> AppResult<Vec<AuditLogEntry>>;
}

/// Reachability check for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync + 'static {
    /// Returns `Ok` when the store answers.
    async fn ping(&self) -> AppResult<()>;
}

/// The full set of stores, behind trait objects.
#[derive(Clone)]
pub struct Stores {
    /// Account store.
    pub accounts: Arc<dyn AccountStore>,
    /// Organization store.
    pub organizations: Arc<dyn OrganizationStore>,
    /// API key store.
    pub api_keys: Arc<dyn ApiKeyStore>,
    /// Audit log store.
    pub audit: Arc<dyn AuditLogStore>,
    /// Health check.
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    /// Open the stores selected by the database configuration.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            tracing::info!("Using in-memory store");
            return Ok(Self::memory(MemoryStore::new()));
        }
        let db = DatabasePool::connect(config).await?;
        Ok(Self::postgres(db))
    }

    /// Stores backed by PostgreSQL.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            accounts: Arc::new(AccountRepository::new(pool.clone())),
            organizations: Arc::new(OrganizationRepository::new(pool.clone())),
            api_keys: Arc::new(ApiKeyRepository::new(pool.clone())),
            audit: Arc::new(AuditLogRepository::new(pool)),
            health: Arc::new(db),
        }
    }

    /// Stores backed by a single in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            accounts: store.clone(),
            organizations: store.clone(),
            api_keys: store.clone(),
            audit: store.clone(),
            health: store,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

#[async_trait]
impl StoreHealth for DatabasePool {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool())
            .await
            .map(|_| ())
            .map_err(|e| {
                orgguard_core::AppError::with_source(
                    orgguard_core::ErrorKind::Internal,
                    "Health check failed",
                    e,
                )
            })
    }
}
