//! Ordered authorization pipeline and per-operation access policies.

pub mod gate;
pub mod policy;

pub use gate::{AccessPipeline, Gate, GateRequest, PermissionGate, RoleGate, TenantGate};
pub use policy::{AccessPolicy, Operation, TenantScope};
