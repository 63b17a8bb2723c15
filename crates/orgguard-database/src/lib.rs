//! # orgguard-database
//!
//! Store traits consumed by the access-control layer, with a PostgreSQL
//! implementation (sqlx) and an in-memory implementation used for
//! development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    AccountStore, ApiKeyStore, AuditLogStore, FoundingAdmin, OrganizationStore, StoreHealth,
    Stores,
};
