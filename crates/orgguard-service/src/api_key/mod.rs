//! API key administration for the caller's organization.

pub mod service;

pub use service::{ApiKeyService, IssueApiKey};
