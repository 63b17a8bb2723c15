//! Account handlers: create, self-service profile, by-id administration.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use orgguard_core::error::AppError;
use orgguard_core::types::AccountId;
use orgguard_entity::account::Account;
use orgguard_service::{NewUser, ProfileUpdate};

use crate::dto::request::{CreateUserRequest, UpdateAccountRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{Identity, ValidatedJson, parse_id};
use crate::state::AppState;

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Account>>), AppError> {
    let account = state
        .account_service
        .create_user(
            &identity,
            NewUser {
                name: req.name,
                email: req.email,
                password: req.password,
                role: req.role,
                organization_id: req.organization_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(account))))
}

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let account = state.account_service.get_profile(&identity).await?;
    Ok(Json(ApiResponse::ok(account)))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let account = state
        .account_service
        .update_profile(&identity, into_update(req))
        .await?;
    Ok(Json(ApiResponse::ok(account)))
}

/// DELETE /api/users/me
pub async fn delete_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.account_service.delete_profile(&identity).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Account deleted"))))
}

/// GET /api/users/{id}
pub async fn get_account(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let id: AccountId = parse_id(&id)?;
    let account = state.account_service.get_account(&identity, id).await?;
    Ok(Json(ApiResponse::ok(account)))
}

/// PUT /api/users/{id}
pub async fn update_account(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let id: AccountId = parse_id(&id)?;
    let account = state
        .account_service
        .update_account(&identity, id, into_update(req))
        .await?;
    Ok(Json(ApiResponse::ok(account)))
}

/// DELETE /api/users/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let id: AccountId = parse_id(&id)?;
    state.account_service.delete_account(&identity, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Account deleted"))))
}

fn into_update(req: UpdateAccountRequest) -> ProfileUpdate {
    ProfileUpdate {
        name: req.name,
        email: req.email,
    }
}
