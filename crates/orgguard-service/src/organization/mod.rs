//! Organization administration.

pub mod service;

pub use service::OrganizationService;
