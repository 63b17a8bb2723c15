//! API key repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use orgguard_core::error::{AppError, ErrorKind};
use orgguard_core::result::AppResult;
use orgguard_core::types::{ApiKeyId, OrganizationId};
use orgguard_entity::api_key::{ApiKey, CreateApiKey};

use super::violated_constraint;
use crate::store::ApiKeyStore;

/// Repository for API keys.
#[derive(Debug, Clone)]
pub struct ApiKeyRepository {
    pool: PgPool,
}

impl ApiKeyRepository {
    /// Create a new API key repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, action: &'static str) -> AppError {
    match violated_constraint(&e) {
        Some("api_keys_key_key") => AppError::conflict("API key value collision"),
        Some("api_keys_organization_id_fkey") => AppError::not_found("Organization not found"),
        _ => AppError::with_source(ErrorKind::Internal, action, e),
    }
}

#[async_trait]
impl ApiKeyStore for ApiKeyRepository {
    async fn create(&self, data: &CreateApiKey) -> AppResult<ApiKey> {
        sqlx::query_as::<_, ApiKey>(
            "INSERT INTO api_keys (id, key, organization_id, created_by, name, permissions, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(ApiKeyId::new())
        .bind(&data.key)
        .bind(data.organization_id)
        .bind(data.created_by)
        .bind(&data.name)
        .bind(&data.permissions)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create API key"))
    }

    async fn find_active_by_key(&self, key: &str) -> AppResult<Option<ApiKey>> {
        sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE key = $1 AND is_active")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to look up API key", e))
    }

    async fn list_active(&self, organization_id: OrganizationId) -> AppResult<Vec<ApiKey>> {
        sqlx::query_as::<_, ApiKey>(
            "SELECT * FROM api_keys WHERE organization_id = $1 AND is_active \
             ORDER BY created_at DESC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to list API keys", e))
    }

    async fn rotate(
        &self,
        id: ApiKeyId,
        organization_id: OrganizationId,
        new_key: &str,
    ) -> AppResult<Option<ApiKey>> {
        sqlx::query_as::<_, ApiKey>(
            "UPDATE api_keys SET key = $3, last_used_at = NULL, updated_at = NOW() \
             WHERE id = $1 AND organization_id = $2 AND is_active \
             RETURNING *",
        )
        .bind(id)
        .bind(organization_id)
        .bind(new_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to rotate API key"))
    }

    async fn revoke(
        &self,
        id: ApiKeyId,
        organization_id: OrganizationId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ApiKey>> {
        sqlx::query_as::<_, ApiKey>(
            "UPDATE api_keys SET is_active = FALSE, revoked_at = $3, updated_at = $3 \
             WHERE id = $1 AND organization_id = $2 AND is_active \
             RETURNING *",
        )
        .bind(id)
        .bind(organization_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to revoke API key", e))
    }

    async fn touch_last_used(&self, id: ApiKeyId, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE api_keys SET last_used_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to update API key usage", e)
            })
    }
}
