//! Core type definitions used across the OrgGuard workspace.

pub mod id;

pub use id::*;
