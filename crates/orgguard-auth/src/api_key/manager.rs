//! API key lifecycle: issue, list, rotate, revoke.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use orgguard_core::error::{AppError, ErrorKind};
use orgguard_core::result::AppResult;
use orgguard_core::types::{AccountId, ApiKeyId, OrganizationId};
use orgguard_database::ApiKeyStore;
use orgguard_entity::api_key::{
    ApiKey, ApiKeyPermission, ApiKeySummary, CreateApiKey, RevocationReceipt, key_prefix,
};

use super::generator::generate_api_key;

/// Attempts made when a freshly generated value collides with an existing key.
const MAX_GENERATION_ATTEMPTS: usize = 3;

/// Minimum key name length after trimming.
const NAME_MIN_LEN: usize = 3;

/// Maximum key name length after trimming.
const NAME_MAX_LEN: usize = 50;

/// Request to issue a new key.
#[derive(Debug, Clone)]
pub struct NewApiKey {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Creating account.
    pub created_by: AccountId,
    /// Human-readable name.
    pub name: String,
    /// Requested permissions. Defaults to `read` when empty.
    pub permissions: Vec<ApiKeyPermission>,
    /// Optional expiry; must lie in the future.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Issues and manages organization-scoped API keys.
#[derive(Clone)]
pub struct ApiKeyManager {
    store: Arc<dyn ApiKeyStore>,
}

impl std::fmt::Debug for ApiKeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyManager").finish_non_exhaustive()
    }
}

impl ApiKeyManager {
    /// Create a manager over the given store.
    pub fn new(store: Arc<dyn ApiKeyStore>) -> Self {
        Self { store }
    }

    /// Persist a new active key. The returned record carries the full value.
    pub async fn create(&self, request: NewApiKey) -> AppResult<ApiKey> {
        let name = request.name.trim().to_string();
        let name_len = name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
            return Err(AppError::validation(
                "API key name must be between 3 and 50 characters",
            ));
        }
        if request.expires_at.is_some_and(|at| at <= Utc::now()) {
            return Err(AppError::validation("API key expiry must be in the future"));
        }
        let permissions = if request.permissions.is_empty() {
            vec![ApiKeyPermission::Read]
        } else {
            request.permissions
        };

        let mut data = CreateApiKey {
            key: String::new(),
            organization_id: request.organization_id,
            created_by: request.created_by,
            name,
            permissions,
            expires_at: request.expires_at,
        };

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            data.key = generate_api_key();
            match self.store.create(&data).await {
                Ok(key) => {
                    info!(
                        api_key_id = %key.id,
                        organization_id = %key.organization_id,
                        key_prefix = %key.key_prefix(),
                        "API key created"
                    );
                    return Ok(key);
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    warn!(attempt, "Generated API key collided; retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal("Could not generate a unique API key"))
    }

    /// Active keys of the organization, newest first, without key values.
    pub async fn list(&self, organization_id: OrganizationId) -> AppResult<Vec<ApiKeySummary>> {
        let keys = self.store.list_active(organization_id).await?;
        Ok(keys.iter().map(ApiKey::summary).collect())
    }

    /// Replace the key value. Identity, name and permissions are kept.
    pub async fn rotate(&self, id: ApiKeyId, organization_id: OrganizationId) -> AppResult<ApiKey> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let new_key = generate_api_key();
            match self.store.rotate(id, organization_id, &new_key).await {
                Ok(Some(key)) => {
                    info!(
                        api_key_id = %key.id,
                        organization_id = %organization_id,
                        key_prefix = %key_prefix(&new_key),
                        "API key rotated"
                    );
                    return Ok(key);
                }
                Ok(None) => return Err(AppError::not_found("API key not found")),
                Err(e) if e.kind == ErrorKind::Conflict => {
                    warn!(attempt, "Rotated API key collided; retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal("Could not generate a unique API key"))
    }

    /// Deactivate the key. A second call on the same key is `NotFound`.
    pub async fn revoke(
        &self,
        id: ApiKeyId,
        organization_id: OrganizationId,
    ) -> AppResult<RevocationReceipt> {
        let now = Utc::now();
        let key = self
            .store
            .revoke(id, organization_id, now)
            .await?
            .ok_or_else(|| AppError::not_found("API key not found"))?;

        info!(api_key_id = %key.id, organization_id = %organization_id, "API key revoked");
        Ok(RevocationReceipt {
            id: key.id,
            name: key.name,
            revoked_at: key.revoked_at.unwrap_or(now),
        })
    }
}
