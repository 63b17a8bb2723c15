//! Application state shared across all handlers.

use std::sync::Arc;

use orgguard_auth::{
    AccessPipeline, ApiKeyManager, AuthResolver, JwtDecoder, JwtEncoder, PasswordHasher,
    PasswordValidator,
};
use orgguard_core::config::AppConfig;
use orgguard_core::result::AppResult;
use orgguard_database::Stores;
use orgguard_service::{
    AccountService, ApiKeyService, AuditRecorder, AuthService, OrganizationService,
};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Backing stores.
    pub stores: Stores,
    /// Credential to identity resolution.
    pub resolver: Arc<AuthResolver>,
    /// Registration and login.
    pub auth_service: Arc<AuthService>,
    /// Account management.
    pub account_service: Arc<AccountService>,
    /// Organization management.
    pub organization_service: Arc<OrganizationService>,
    /// API key lifecycle.
    pub api_key_service: Arc<ApiKeyService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire every service over the given stores.
    ///
    /// Fails when the auth configuration cannot sign tokens.
    pub fn new(config: AppConfig, stores: Stores) -> AppResult<Self> {
        config.auth.validate()?;

        let hasher = Arc::new(PasswordHasher::new());
        let validator = PasswordValidator::new(&config.auth);
        let encoder = JwtEncoder::new(&config.auth);
        let decoder = JwtDecoder::new(&config.auth);
        let pipeline = Arc::new(AccessPipeline::standard(stores.accounts.clone()));
        tracing::debug!(gates = ?pipeline, "Access pipeline ready");
        let audit = AuditRecorder::new(stores.audit.clone());

        let resolver = Arc::new(AuthResolver::new(
            decoder,
            stores.api_keys.clone(),
            stores.organizations.clone(),
        ));

        let auth_service = Arc::new(AuthService::new(
            stores.accounts.clone(),
            stores.organizations.clone(),
            Arc::clone(&hasher),
            validator.clone(),
            encoder,
            audit.clone(),
        ));
        let account_service = Arc::new(AccountService::new(
            stores.accounts.clone(),
            Arc::clone(&pipeline),
            hasher,
            validator,
            audit.clone(),
        ));
        let organization_service = Arc::new(OrganizationService::new(
            stores.organizations.clone(),
            Arc::clone(&pipeline),
            audit.clone(),
        ));
        let api_key_service = Arc::new(ApiKeyService::new(
            ApiKeyManager::new(stores.api_keys.clone()),
            pipeline,
            audit,
        ));

        Ok(Self {
            config: Arc::new(config),
            stores,
            resolver,
            auth_service,
            account_service,
            organization_service,
            api_key_service,
        })
    }
}
