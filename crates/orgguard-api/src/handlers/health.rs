//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use orgguard_database::StoreHealth;

use crate::dto::response::{ApiResponse, HealthResponse, HealthStatus};
use crate::state::AppState;

/// GET /health
///
/// Unauthenticated. Answers 503 while the credential store is unreachable,
/// since no request could be authorized in that state.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let reachable = match state.stores.health.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };
    let (code, status) = if reachable {
        (StatusCode::OK, HealthStatus::Ok)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Degraded)
    };

    (
        code,
        Json(ApiResponse::ok(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            store_reachable: reachable,
            timestamp: Utc::now(),
        })),
    )
}
