//! Route definitions for the OrgGuard HTTP API.
//!
//! Domain routes are mounted under `/api`; the health check sits at the root.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the router with all routes, threading `AppState` through every handler.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(organization_routes())
        .merge(api_key_routes());

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Public endpoints: register, register founder, login
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/register/founder", post(handlers::auth::register_founder))
        .route("/auth/login", post(handlers::auth::login))
}

/// Account creation, self-service and by-id administration
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::user::create_user))
        .route(
            "/users/me",
            get(handlers::user::get_profile)
                .put(handlers::user::update_profile)
                .delete(handlers::user::delete_profile),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_account)
                .put(handlers::user::update_account)
                .delete(handlers::user::delete_account),
        )
}

/// Organization management
fn organization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{id}",
            get(handlers::organization::get_organization)
                .put(handlers::organization::update_organization)
                .delete(handlers::organization::delete_organization),
        )
        .route(
            "/organizations/{id}/users",
            get(handlers::organization::list_users),
        )
        .route(
            "/organizations/{id}/audit-logs",
            get(handlers::organization::list_audit_logs),
        )
}

/// API key lifecycle
fn api_key_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api-keys",
            post(handlers::api_key::create_api_key).get(handlers::api_key::list_api_keys),
        )
        .route("/api-keys/{id}", delete(handlers::api_key::revoke_api_key))
        .route("/api-keys/{id}/rotate", put(handlers::api_key::rotate_api_key))
}
