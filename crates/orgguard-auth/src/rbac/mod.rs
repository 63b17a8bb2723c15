//! Role-based and permission-based access checks.

pub mod enforcer;

pub use enforcer::RbacEnforcer;
