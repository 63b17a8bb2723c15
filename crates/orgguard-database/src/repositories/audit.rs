//! Audit log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use orgguard_core::error::{AppError, ErrorKind};
use orgguard_core::result::AppResult;
use orgguard_core::types::{AuditLogId, OrganizationId};
use orgguard_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

use crate::store::AuditLogStore;

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for AuditLogRepository {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_logs (id, account_id, organization_id, action, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(AuditLogId::new())
        .bind(entry.account_id)
        .bind(entry.organization_id)
        .bind(&entry.action)
        .bind(&entry.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to create audit entry", e))
    }

    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
        limit: i64,
    ) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_logs WHERE organization_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(organization_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to list audit log", e))
    }
}
