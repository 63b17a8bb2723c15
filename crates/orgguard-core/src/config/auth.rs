//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted session token lifetime (one week).
pub const MAX_TOKEN_TTL_MINUTES: u64 = 10_080;

/// Authentication and credential configuration.
///
/// The signing secret is loaded once at startup and never mutated for
/// the lifetime of the process.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for session token signing (HMAC-SHA256).
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token lifetime in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Allowed clock skew when checking token expiry. Zero makes expiry exact.
    #[serde(default = "default_leeway")]
    pub token_leeway_seconds: u64,
    /// Minimum password length accepted at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Reject configurations that cannot sign tokens safely.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "auth.jwt_secret must be set (ORGGUARD__AUTH__JWT_SECRET)",
            ));
        }
        if self.token_ttl_minutes == 0 || self.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.token_ttl_minutes must be between 1 and {MAX_TOKEN_TTL_MINUTES}"
            )));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_minutes: default_token_ttl(),
            token_leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

fn default_token_ttl() -> u64 {
    60
}

fn default_leeway() -> u64 {
    0
}

fn default_password_min() -> usize {
    6
}
