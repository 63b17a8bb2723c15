//! Best-effort audit trail recording.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use orgguard_core::result::AppResult;
use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_database::AuditLogStore;
use orgguard_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};

/// Upper bound on entries returned by one listing.
pub const MAX_AUDIT_PAGE: i64 = 500;

/// Appends and lists audit entries.
///
/// A failed append never fails the operation being audited.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditLogStore>,
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder").finish_non_exhaustive()
    }
}

impl AuditRecorder {
    /// Creates a recorder over the given store.
    pub fn new(store: Arc<dyn AuditLogStore>) -> Self {
        Self { store }
    }

    /// Records an action. Store failures are logged and swallowed.
    pub async fn record(
        &self,
        account_id: AccountId,
        organization_id: OrganizationId,
        action: AuditAction,
        details: Value,
    ) {
        let entry = CreateAuditLogEntry {
            account_id,
            organization_id,
            action: action.as_str().to_string(),
            details,
        };
        if let Err(e) = self.store.append(&entry).await {
            warn!(
                action = action.as_str(),
                %organization_id,
                error = %e,
                "Failed to record audit entry"
            );
        }
    }

    /// Most recent entries of an organization, newest first.
    pub async fn recent(
        &self,
        organization_id: OrganizationId,
        limit: i64,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.store
            .list_by_organization(organization_id, limit.clamp(1, MAX_AUDIT_PAGE))
            .await
    }
}
