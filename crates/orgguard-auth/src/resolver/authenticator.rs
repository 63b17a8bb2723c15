//! Resolves a request's credential into an [`IdentityContext`].

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use orgguard_core::error::AppError;
use orgguard_core::result::AppResult;
use orgguard_database::{ApiKeyStore, OrganizationStore};
use orgguard_entity::account::AccountRole;
use orgguard_entity::api_key::ApiKey;

use super::credentials::{Credential, CredentialSources, extract_credential};
use crate::api_key::is_valid_api_key_format;
use crate::context::IdentityContext;
use crate::jwt::JwtDecoder;

/// Role assigned to every key-authenticated request. Keys are only issued
/// by admins and managers; their permission set does the narrowing.
const API_KEY_ROLE: AccountRole = AccountRole::Admin;

/// Single entry point of authentication.
#[derive(Clone)]
pub struct AuthResolver {
    decoder: JwtDecoder,
    api_keys: Arc<dyn ApiKeyStore>,
    organizations: Arc<dyn OrganizationStore>,
}

impl std::fmt::Debug for AuthResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResolver")
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

impl AuthResolver {
    /// Create a resolver.
    pub fn new(
        decoder: JwtDecoder,
        api_keys: Arc<dyn ApiKeyStore>,
        organizations: Arc<dyn OrganizationStore>,
    ) -> Self {
        Self {
            decoder,
            api_keys,
            organizations,
        }
    }

    /// Authenticate the request described by `sources`.
    pub async fn resolve(&self, sources: &CredentialSources<'_>) -> AppResult<IdentityContext> {
        match extract_credential(sources) {
            Some(Credential::ApiKey(key)) => self.resolve_api_key(&key).await,
            Some(Credential::SessionToken(token)) => self.resolve_session_token(&token),
            None => Err(AppError::unauthenticated("Authentication required")),
        }
    }

    fn resolve_session_token(&self, token: &str) -> AppResult<IdentityContext> {
        let claims = self.decoder.verify(token)?;
        Ok(IdentityContext::from_claims(&claims))
    }

    async fn resolve_api_key(&self, value: &str) -> AppResult<IdentityContext> {
        if !is_valid_api_key_format(value) {
            return Err(AppError::invalid_credential_format("Invalid API key format"));
        }

        let key = self
            .api_keys
            .find_active_by_key(value)
            .await?
            .ok_or_else(|| AppError::invalid_or_revoked("Invalid or revoked API key"))?;

        let now = Utc::now();
        if key.is_expired_at(now) {
            return Err(AppError::credential_expired("API key has expired"));
        }

        let active = self
            .organizations
            .find_by_id(key.organization_id)
            .await?
            .is_some_and(|org| org.is_active);
        if !active {
            return Err(AppError::organization_inactive("Organization is inactive"));
        }

        self.touch_last_used(&key, now);
        debug!(api_key_id = %key.id, key_prefix = %key.key_prefix(), "Authenticated by API key");

        Ok(IdentityContext {
            account_id: key.created_by,
            organization_id: key.organization_id,
            role: API_KEY_ROLE,
            permissions: Some(key.permissions),
            api_key_id: Some(key.id),
        })
    }

    /// Best-effort usage stamp, detached from the request.
    fn touch_last_used(&self, key: &ApiKey, at: chrono::DateTime<Utc>) {
        let store = Arc::clone(&self.api_keys);
        let id = key.id;
        tokio::spawn(async move {
            if let Err(e) = store.touch_last_used(id, at).await {
                warn!(api_key_id = %id, error = %e, "Failed to record API key usage");
            }
        });
    }
}
