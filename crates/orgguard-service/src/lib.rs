//! # orgguard-service
//!
//! Business logic service layer for OrgGuard. Every operation on behalf of
//! an authenticated caller passes the [`AccessPipeline`] before touching a
//! store, so the HTTP layer only has to resolve identity and shape input.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.
//!
//! [`AccessPipeline`]: orgguard_auth::AccessPipeline

pub mod account;
pub mod api_key;
pub mod audit;
pub mod auth;
pub mod organization;

#[cfg(test)]
pub(crate) mod testing;

pub use account::{AccountService, NewUser, ProfileUpdate};
pub use api_key::{ApiKeyService, IssueApiKey};
pub use audit::AuditRecorder;
pub use auth::{AuthService, LoginResult, Registration};
pub use organization::OrganizationService;
