//! Organization handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use orgguard_core::error::AppError;
use orgguard_core::types::OrganizationId;
use orgguard_entity::account::Account;
use orgguard_entity::audit::AuditLogEntry;
use orgguard_entity::organization::{Organization, UpdateOrganization};

use crate::dto::request::{AuditLogQuery, UpdateOrganizationRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{Identity, ValidatedJson, parse_id};
use crate::state::AppState;

/// GET /api/organizations/{id}
pub async fn get_organization(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Organization>>, AppError> {
    let id: OrganizationId = parse_id(&id)?;
    let organization = state.organization_service.get(&identity, id).await?;
    Ok(Json(ApiResponse::ok(organization)))
}

/// PUT /api/organizations/{id}
pub async fn update_organization(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateOrganizationRequest>,
) -> Result<Json<ApiResponse<Organization>>, AppError> {
    let id: OrganizationId = parse_id(&id)?;
    let organization = state
        .organization_service
        .update(
            &identity,
            id,
            UpdateOrganization {
                name: req.name,
                address: req.address,
                is_active: req.is_active,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(organization)))
}

/// DELETE /api/organizations/{id}
pub async fn delete_organization(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let id: OrganizationId = parse_id(&id)?;
    state.organization_service.delete(&identity, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Organization deleted",
    ))))
}

/// GET /api/organizations/{id}/users
pub async fn list_users(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Account>>>, AppError> {
    let id: OrganizationId = parse_id(&id)?;
    let users = state
        .account_service
        .list_organization_users(&identity, id)
        .await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/organizations/{id}/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Query(params): Query<AuditLogQuery>,
) -> Result<Json<ApiResponse<Vec<AuditLogEntry>>>, AppError> {
    let id: OrganizationId = parse_id(&id)?;
    let entries = state
        .organization_service
        .audit_log(&identity, id, params.limit)
        .await?;
    Ok(Json(ApiResponse::ok(entries)))
}
