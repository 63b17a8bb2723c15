//! Issue, list, rotate and revoke API keys.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use orgguard_auth::{AccessPipeline, ApiKeyManager, IdentityContext, NewApiKey, Operation, TenantTarget};
use orgguard_core::result::AppResult;
use orgguard_core::types::ApiKeyId;
use orgguard_entity::api_key::{ApiKey, ApiKeyPermission, ApiKeySummary, RevocationReceipt};
use orgguard_entity::audit::AuditAction;

use crate::audit::AuditRecorder;

/// Input for issuing a key.
#[derive(Debug, Clone)]
pub struct IssueApiKey {
    /// Human-readable name.
    pub name: String,
    /// Requested permissions; `read` when empty.
    pub permissions: Vec<ApiKeyPermission>,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Key operations on the caller's organization.
///
/// Keys are always created in, and looked up within, the caller's own
/// organization; there is no way to address another tenant's keys.
#[derive(Clone)]
pub struct ApiKeyService {
    manager: ApiKeyManager,
    pipeline: Arc<AccessPipeline>,
    audit: AuditRecorder,
}

impl std::fmt::Debug for ApiKeyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyService").finish_non_exhaustive()
    }
}

impl ApiKeyService {
    /// Creates a new API key service.
    pub fn new(manager: ApiKeyManager, pipeline: Arc<AccessPipeline>, audit: AuditRecorder) -> Self {
        Self {
            manager,
            pipeline,
            audit,
        }
    }

    /// Issues a key. The returned record is the only time the full value is shown.
    pub async fn create(&self, ctx: &IdentityContext, input: IssueApiKey) -> AppResult<ApiKey> {
        self.pipeline
            .authorize(ctx, Operation::CreateApiKey, TenantTarget::default())
            .await?;

        let key = self
            .manager
            .create(NewApiKey {
                organization_id: ctx.organization_id,
                created_by: ctx.account_id,
                name: input.name,
                permissions: input.permissions,
                expires_at: input.expires_at,
            })
            .await?;

        self.audit
            .record(
                ctx.account_id,
                ctx.organization_id,
                AuditAction::ApiKeyCreate,
                json!({
                    "api_key_id": key.id,
                    "name": key.name,
                    "key_prefix": key.key_prefix(),
                    "permissions": key.permissions,
                }),
            )
            .await;
        Ok(key)
    }

    pub async fn list(&self, ctx: &IdentityContext) -> AppResult<Vec<ApiKeySummary>> {
        self.pipeline
            .authorize(ctx, Operation::ListApiKeys, TenantTarget::default())
            .await?;
        self.manager.list(ctx.organization_id).await
    }

    /// Replaces the key value; the old value stops working immediately.
    pub async fn rotate(&self, ctx: &IdentityContext, id: ApiKeyId) -> AppResult<ApiKey> {
        self.pipeline
            .authorize(ctx, Operation::RotateApiKey, TenantTarget::default())
            .await?;

        let key = self.manager.rotate(id, ctx.organization_id).await?;
        self.audit
            .record(
                ctx.account_id,
                ctx.organization_id,
                AuditAction::ApiKeyRotate,
                json!({ "api_key_id": key.id, "key_prefix": key.key_prefix() }),
            )
            .await;
        Ok(key)
    }

    pub async fn revoke(&self, ctx: &IdentityContext, id: ApiKeyId) -> AppResult<RevocationReceipt> {
        self.pipeline
            .authorize(ctx, Operation::RevokeApiKey, TenantTarget::default())
            .await?;

        let receipt = self.manager.revoke(id, ctx.organization_id).await?;
        self.audit
            .record(
                ctx.account_id,
                ctx.organization_id,
                AuditAction::ApiKeyRevoke,
                json!({ "api_key_id": receipt.id, "name": receipt.name }),
            )
            .await;
        Ok(receipt)
    }
}
