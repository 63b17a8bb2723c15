//! Route handlers organized by domain.

pub mod api_key;
pub mod auth;
pub mod health;
pub mod organization;
pub mod user;
