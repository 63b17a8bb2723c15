//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use orgguard_core::error::{AppError, ErrorKind};

/// Message returned in place of infrastructure error details.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// HTTP status for an error category.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthenticated
        | ErrorKind::InvalidCredentialFormat
        | ErrorKind::InvalidOrRevokedCredential
        | ErrorKind::CredentialExpired => StatusCode::UNAUTHORIZED,
        ErrorKind::OrganizationInactive
        | ErrorKind::InsufficientRole
        | ErrorKind::InsufficientPermission
        | ErrorKind::CrossTenantAccessDenied
        | ErrorKind::FirstUserAlreadyExists => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Internal | ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind);
        let message = if status.is_server_error() {
            tracing::error!(
                kind = %self.kind,
                error = %self.message,
                source = ?self.source,
                "Internal server error"
            );
            INTERNAL_MESSAGE.to_string()
        } else {
            if self.kind.is_access_denial() {
                tracing::debug!(code = self.kind.code(), "Access denied");
            }
            self.message
        };

        let body = ApiErrorResponse {
            error: self.kind.code().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
