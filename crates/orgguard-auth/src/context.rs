//! The resolved principal of one request.

use serde::Serialize;

use orgguard_core::types::{AccountId, ApiKeyId, OrganizationId};
use orgguard_entity::account::AccountRole;
use orgguard_entity::api_key::ApiKeyPermission;

use crate::jwt::Claims;

/// Normalized identity the gates decide on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityContext {
    /// Acting account (the key creator for key-authenticated requests).
    pub account_id: AccountId,
    /// Organization the principal belongs to.
    pub organization_id: OrganizationId,
    /// Effective role.
    pub role: AccountRole,
    /// Permission set of the presenting key; `None` for session tokens.
    pub permissions: Option<Vec<ApiKeyPermission>>,
    /// The presenting key, when authenticated by API key.
    pub api_key_id: Option<ApiKeyId>,
}

impl IdentityContext {
    /// Context for a verified session token.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            account_id: claims.sub,
            organization_id: claims.org_id,
            role: claims.role,
            permissions: None,
            api_key_id: None,
        }
    }

    /// Whether the request was authenticated with an API key.
    pub fn is_api_key(&self) -> bool {
        self.api_key_id.is_some()
    }
}
