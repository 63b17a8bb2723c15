//! Read, change and delete an organization; read its audit trail.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use orgguard_auth::{AccessPipeline, IdentityContext, Operation, TenantTarget};
use orgguard_core::error::AppError;
use orgguard_core::result::AppResult;
use orgguard_core::types::OrganizationId;
use orgguard_database::OrganizationStore;
use orgguard_entity::audit::{AuditAction, AuditLogEntry};
use orgguard_entity::organization::{Organization, UpdateOrganization};

use crate::audit::AuditRecorder;

/// Organization operations, all scoped to the caller's own organization.
#[derive(Clone)]
pub struct OrganizationService {
    organizations: Arc<dyn OrganizationStore>,
    pipeline: Arc<AccessPipeline>,
    audit: AuditRecorder,
}

impl std::fmt::Debug for OrganizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationService").finish_non_exhaustive()
    }
}

impl OrganizationService {
    /// Creates a new organization service.
    pub fn new(
        organizations: Arc<dyn OrganizationStore>,
        pipeline: Arc<AccessPipeline>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            organizations,
            pipeline,
            audit,
        }
    }

    pub async fn get(&self, ctx: &IdentityContext, id: OrganizationId) -> AppResult<Organization> {
        self.pipeline
            .authorize(ctx, Operation::GetOrganization, TenantTarget::path(id))
            .await?;
        self.organizations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))
    }

    pub async fn update(
        &self,
        ctx: &IdentityContext,
        id: OrganizationId,
        data: UpdateOrganization,
    ) -> AppResult<Organization> {
        self.pipeline
            .authorize(ctx, Operation::UpdateOrganization, TenantTarget::path(id))
            .await?;

        let data = UpdateOrganization {
            name: match data.name {
                Some(n) if n.trim().is_empty() => {
                    return Err(AppError::validation("Organization name cannot be empty"));
                }
                other => other.map(|n| n.trim().to_string()),
            },
            ..data
        };

        let organization = self
            .organizations
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        self.audit
            .record(
                ctx.account_id,
                id,
                AuditAction::OrganizationUpdate,
                json!({
                    "name": data.name,
                    "address": data.address,
                    "is_active": data.is_active,
                }),
            )
            .await;
        Ok(organization)
    }

    /// Deletes the organization with its accounts and keys.
    pub async fn delete(&self, ctx: &IdentityContext, id: OrganizationId) -> AppResult<()> {
        self.pipeline
            .authorize(ctx, Operation::DeleteOrganization, TenantTarget::path(id))
            .await?;

        if !self.organizations.delete(id).await? {
            return Err(AppError::not_found("Organization not found"));
        }
        info!(organization_id = %id, deleted_by = %ctx.account_id, "Organization deleted");
        self.audit
            .record(ctx.account_id, id, AuditAction::OrganizationDelete, json!({}))
            .await;
        Ok(())
    }

    /// Most recent audit entries, newest first.
    pub async fn audit_log(
        &self,
        ctx: &IdentityContext,
        id: OrganizationId,
        limit: i64,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.pipeline
            .authorize(ctx, Operation::ListAuditLog, TenantTarget::path(id))
            .await?;
        self.audit.recent(id, limit).await
    }
}
