//! Organization repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use orgguard_core::error::{AppError, ErrorKind};
use orgguard_core::result::AppResult;
use orgguard_core::types::OrganizationId;
use orgguard_entity::organization::{Organization, UpdateOrganization};

use super::violated_constraint;
use crate::store::OrganizationStore;

/// Repository for organizations.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationStore for OrganizationRepository {
    async fn find_by_id(&self, id: OrganizationId) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to find organization", e)
            })
    }

    async fn update(
        &self,
        id: OrganizationId,
        data: &UpdateOrganization,
    ) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET name = COALESCE($2, name), \
                                      address = COALESCE($3, address), \
                                      is_active = COALESCE($4, is_active), \
                                      updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.address)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("organizations_name_key") => {
                AppError::conflict("Organization name already in use")
            }
            _ => AppError::with_source(ErrorKind::Internal, "Failed to update organization", e),
        })
    }

    async fn delete(&self, id: OrganizationId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to delete organization", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
