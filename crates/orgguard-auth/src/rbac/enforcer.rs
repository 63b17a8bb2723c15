//! RBAC enforcement: role membership and API key permission checks.

use orgguard_core::error::AppError;
use orgguard_entity::account::AccountRole;
use orgguard_entity::api_key::ApiKeyPermission;

use crate::context::IdentityContext;

/// Stateless role and permission checks.
///
/// Role checks and permission checks are independent; an operation's
/// policy says which of them apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// `true` iff the context's role is in `allowed`. An empty set denies.
    pub fn authorize(&self, ctx: &IdentityContext, allowed: &[AccountRole]) -> bool {
        allowed.contains(&ctx.role)
    }

    /// Like [`authorize`](Self::authorize), as a result.
    pub fn require_role(&self, ctx: &IdentityContext, allowed: &[AccountRole]) -> Result<(), AppError> {
        if self.authorize(ctx, allowed) {
            Ok(())
        } else {
            Err(AppError::insufficient_role(format!(
                "Role '{}' is not permitted to perform this operation",
                ctx.role
            )))
        }
    }

    /// `true` iff `granted` contains `admin` or shares a permission with `required`.
    pub fn has_permission(&self, granted: &[ApiKeyPermission], required: &[ApiKeyPermission]) -> bool {
        granted.contains(&ApiKeyPermission::Admin) || granted.iter().any(|p| required.contains(p))
    }

    /// Permission check for key-authenticated contexts.
    ///
    /// Session contexts carry no permission set and are governed by roles
    /// alone, so they pass.
    pub fn require_permission(
        &self,
        ctx: &IdentityContext,
        required: &[ApiKeyPermission],
    ) -> Result<(), AppError> {
        let Some(granted) = &ctx.permissions else {
            return Ok(());
        };
        if self.has_permission(granted, required) {
            Ok(())
        } else {
            Err(AppError::insufficient_permission(
                "API key lacks the permission required for this operation",
            ))
        }
    }

    /// Only admins may hand out the admin role.
    pub fn can_assign_role(&self, actor: AccountRole, target: AccountRole) -> bool {
        !target.is_admin() || actor.is_admin()
    }
}
