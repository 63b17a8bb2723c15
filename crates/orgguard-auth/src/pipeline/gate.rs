//! Gates and the pipeline that runs them.

use std::sync::Arc;

use async_trait::async_trait;

use orgguard_core::result::AppResult;
use orgguard_database::AccountStore;

use super::policy::{AccessPolicy, Operation, TenantScope};
use crate::context::IdentityContext;
use crate::rbac::RbacEnforcer;
use crate::tenant::{TenantGuard, TenantTarget};

/// Everything a gate may look at besides the identity.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest {
    /// Policy of the requested operation.
    pub policy: AccessPolicy,
    /// Tenant hints extracted from the request.
    pub target: TenantTarget,
}

/// One authorization step. Returns `Err` to deny.
#[async_trait]
pub trait Gate: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Allow or deny the request.
    async fn check(&self, ctx: &IdentityContext, request: &GateRequest) -> AppResult<()>;
}

/// Role membership.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGate(RbacEnforcer);

#[async_trait]
impl Gate for RoleGate {
    fn name(&self) -> &'static str {
        "role"
    }

    async fn check(&self, ctx: &IdentityContext, request: &GateRequest) -> AppResult<()> {
        self.0.require_role(ctx, request.policy.roles)
    }
}

/// API key permission set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionGate(RbacEnforcer);

#[async_trait]
impl Gate for PermissionGate {
    fn name(&self) -> &'static str {
        "permission"
    }

    async fn check(&self, ctx: &IdentityContext, request: &GateRequest) -> AppResult<()> {
        if request.policy.permissions.is_empty() {
            return Ok(());
        }
        self.0.require_permission(ctx, request.policy.permissions)
    }
}

/// Tenant isolation.
#[derive(Debug, Clone)]
pub struct TenantGate(TenantGuard);

impl TenantGate {
    /// Wrap a tenant guard.
    pub fn new(guard: TenantGuard) -> Self {
        Self(guard)
    }
}

#[async_trait]
impl Gate for TenantGate {
    fn name(&self) -> &'static str {
        "tenant"
    }

    async fn check(&self, ctx: &IdentityContext, request: &GateRequest) -> AppResult<()> {
        match request.policy.tenant {
            TenantScope::Caller => Ok(()),
            TenantScope::Target => self.0.authorize(ctx, &request.target).await,
        }
    }
}

/// Runs gates in order and stops at the first denial.
#[derive(Clone)]
pub struct AccessPipeline {
    gates: Vec<Arc<dyn Gate>>,
}

impl std::fmt::Debug for AccessPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.gates.iter().map(|g| g.name()))
            .finish()
    }
}

impl AccessPipeline {
    /// A pipeline over the given gates.
    pub fn new(gates: Vec<Arc<dyn Gate>>) -> Self {
        Self { gates }
    }

    /// Role, then permission, then tenant.
    pub fn standard(accounts: Arc<dyn AccountStore>) -> Self {
        Self::new(vec![
            Arc::new(RoleGate::default()),
            Arc::new(PermissionGate::default()),
            Arc::new(TenantGate::new(TenantGuard::new(accounts))),
        ])
    }

    /// Authorize `operation` for `ctx`.
    pub async fn authorize(
        &self,
        ctx: &IdentityContext,
        operation: Operation,
        target: TenantTarget,
    ) -> AppResult<()> {
        let request = GateRequest {
            policy: operation.policy(),
            target,
        };
        for gate in &self.gates {
            if let Err(e) = gate.check(ctx, &request).await {
                tracing::debug!(
                    gate = gate.name(),
                    ?operation,
                    account_id = %ctx.account_id,
                    reason = %e.kind,
                    "Request denied"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}
