//! `Identity` extractor: resolves the request's credential into an identity context.

use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::Deserialize;

use orgguard_auth::{CredentialSources, IdentityContext};
use orgguard_core::error::AppError;

use crate::state::AppState;

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct Identity(pub IdentityContext);

impl std::ops::Deref for Identity {
    type Target = IdentityContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct CredentialQuery {
    api_key: Option<String>,
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key_query = Query::<CredentialQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.api_key);

        let sources = CredentialSources {
            api_key_header: header(parts, API_KEY_HEADER),
            authorization: header(parts, AUTHORIZATION.as_str()),
            api_key_query: api_key_query.as_deref(),
        };

        let ctx = state.resolver.resolve(&sources).await?;
        Ok(Identity(ctx))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}
