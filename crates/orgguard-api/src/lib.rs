//! # orgguard-api
//!
//! HTTP API layer for OrgGuard built on Axum.
//!
//! Resolves the caller's identity from request credentials, validates
//! request bodies, hands both to the service layer and maps
//! [`AppError`](orgguard_core::AppError) to status codes.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
