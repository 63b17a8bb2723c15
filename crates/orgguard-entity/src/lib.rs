//! # orgguard-entity
//!
//! Domain entity models for OrgGuard. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod account;
pub mod api_key;
pub mod audit;
pub mod organization;
