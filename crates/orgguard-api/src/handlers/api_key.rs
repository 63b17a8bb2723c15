//! API key handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use orgguard_core::error::AppError;
use orgguard_core::types::ApiKeyId;
use orgguard_entity::api_key::{ApiKey, ApiKeyPermission, ApiKeySummary, RevocationReceipt};
use orgguard_service::IssueApiKey;

use crate::dto::request::CreateApiKeyRequest;
use crate::dto::response::ApiResponse;
use crate::extractors::{Identity, ValidatedJson, parse_id};
use crate::state::AppState;

/// POST /api/api-keys
///
/// The response is the only place the full key value is returned.
pub async fn create_api_key(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(req): ValidatedJson<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ApiKey>>), AppError> {
    let permissions = ApiKeyPermission::parse_all(&req.permissions)?;
    let key = state
        .api_key_service
        .create(
            &identity,
            IssueApiKey {
                name: req.name,
                permissions,
                expires_at: req.expires_at,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(key))))
}

/// GET /api/api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<Vec<ApiKeySummary>>>, AppError> {
    let keys = state.api_key_service.list(&identity).await?;
    Ok(Json(ApiResponse::ok(keys)))
}

/// PUT /api/api-keys/{id}/rotate
pub async fn rotate_api_key(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ApiKey>>, AppError> {
    let id: ApiKeyId = parse_id(&id)?;
    let key = state.api_key_service.rotate(&identity, id).await?;
    Ok(Json(ApiResponse::ok(key)))
}

/// DELETE /api/api-keys/{id}
pub async fn revoke_api_key(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RevocationReceipt>>, AppError> {
    let id: ApiKeyId = parse_id(&id)?;
    let receipt = state.api_key_service.revoke(&identity, id).await?;
    Ok(Json(ApiResponse::ok(receipt)))
}
