//! Auth handlers: register, register founder, login.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use orgguard_core::error::AppError;
use orgguard_entity::account::Account;
use orgguard_service::{LoginResult, Registration};

use crate::dto::request::{LoginRequest, RegisterFounderRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, FounderResponse};
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Account>>), AppError> {
    let account = state
        .auth_service
        .register(Registration {
            name: req.name,
            email: req.email,
            password: req.password,
            organization_id: req.organization_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(account))))
}

/// POST /api/auth/register/founder
pub async fn register_founder(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterFounderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FounderResponse>>), AppError> {
    let (organization, account) = state
        .auth_service
        .register_founder(
            Registration {
                name: req.name,
                email: req.email,
                password: req.password,
                organization_id: req.organization_id,
            },
            req.organization_name,
            req.organization_address,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(FounderResponse {
            account,
            organization,
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, AppError> {
    let result = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(result)))
}
