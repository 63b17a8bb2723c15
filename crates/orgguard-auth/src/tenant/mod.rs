//! Tenant isolation.

pub mod gate;

pub use gate::{TenantGuard, TenantTarget};
