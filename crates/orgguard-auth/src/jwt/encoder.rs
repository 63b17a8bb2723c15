//! Session token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use orgguard_core::config::{AuthConfig, MAX_TOKEN_TTL_MINUTES};
use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_entity::account::AccountRole;

use super::claims::Claims;
use super::error::TokenError;

/// Signs session tokens with the process-wide secret.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl: chrono::Duration,
}

/// A freshly issued session token.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedToken {
    /// The signed token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").field("ttl", &self.ttl).finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// The lifetime is clamped to [`MAX_TOKEN_TTL_MINUTES`].
    pub fn new(config: &AuthConfig) -> Self {
        let ttl_minutes = config.token_ttl_minutes.clamp(1, MAX_TOKEN_TTL_MINUTES) as i64;
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: chrono::Duration::minutes(ttl_minutes),
        }
    }

    /// Issues a token valid from now.
    pub fn issue(
        &self,
        account_id: AccountId,
        role: AccountRole,
        organization_id: OrganizationId,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(account_id, role, organization_id, Utc::now())
    }

    /// Issues a token as if it were signed at `now`.
    pub fn issue_at(
        &self,
        account_id: AccountId,
        role: AccountRole,
        organization_id: OrganizationId,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encoding("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: account_id,
            role,
            org_id: organization_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}
