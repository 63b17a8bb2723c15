//! Unified application error types for OrgGuard.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] set is the
//! complete list of categories the access-control boundary may report;
//! every gate failure is expressed as one of them.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No usable credential was presented, or credentials did not match.
    Unauthenticated,
    /// A credential was presented but its shape is wrong.
    InvalidCredentialFormat,
    /// The credential is unknown, revoked, or carries a bad signature.
    InvalidOrRevokedCredential,
    /// The credential was valid once but has expired.
    CredentialExpired,
    /// The credential belongs to an inactive organization.
    OrganizationInactive,
    /// The caller's role is not in the operation's allowed set.
    InsufficientRole,
    /// The API key's permission set does not cover the operation.
    InsufficientPermission,
    /// The request targets another tenant, or no tenant could be resolved.
    CrossTenantAccessDenied,
    /// The resource is absent within the caller's scope.
    NotFound,
    /// A unique field already exists.
    Conflict,
    /// A founding admin already exists for the requested organization.
    FirstUserAlreadyExists,
    /// Input validation failed.
    Validation,
    /// Store or infrastructure failure. Safe to retry.
    Internal,
    /// A configuration error occurred at startup.
    Configuration,
}

impl ErrorKind {
    /// Stable machine-checkable code for this category.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentialFormat => "INVALID_CREDENTIAL_FORMAT",
            Self::InvalidOrRevokedCredential => "INVALID_OR_REVOKED_CREDENTIAL",
            Self::CredentialExpired => "CREDENTIAL_EXPIRED",
            Self::OrganizationInactive => "ORGANIZATION_INACTIVE",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::InsufficientPermission => "INSUFFICIENT_PERMISSION",
            Self::CrossTenantAccessDenied => "CROSS_TENANT_ACCESS_DENIED",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::FirstUserAlreadyExists => "FIRST_USER_ALREADY_EXISTS",
            Self::Validation => "VALIDATION_FAILED",
            Self::Internal => "INTERNAL_ERROR",
            Self::Configuration => "CONFIGURATION",
        }
    }

    /// Whether the failure is an infrastructure fault that a caller may retry.
    ///
    /// Authentication and authorization failures are never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Whether the failure came from an authentication or authorization gate.
    pub fn is_access_denial(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated
                | Self::InvalidCredentialFormat
                | Self::InvalidOrRevokedCredential
                | Self::CredentialExpired
                | Self::OrganizationInactive
                | Self::InsufficientRole
                | Self::InsufficientPermission
                | Self::CrossTenantAccessDenied
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout OrgGuard.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// Create an invalid-credential-format error.
    pub fn invalid_credential_format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentialFormat, message)
    }

    /// Create an invalid-or-revoked-credential error.
    pub fn invalid_or_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOrRevokedCredential, message)
    }

    /// Create a credential-expired error.
    pub fn credential_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialExpired, message)
    }

    /// Create an organization-inactive error.
    pub fn organization_inactive(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OrganizationInactive, message)
    }

    /// Create an insufficient-role error.
    pub fn insufficient_role(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientRole, message)
    }

    /// Create an insufficient-permission error.
    pub fn insufficient_permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientPermission, message)
    }

    /// Create a cross-tenant denial.
    pub fn cross_tenant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CrossTenantAccessDenied, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a first-user-already-exists error.
    pub fn first_user_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FirstUserAlreadyExists, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether the error is a store/infrastructure failure.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
