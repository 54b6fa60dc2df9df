use serde::Serialize;
use thiserror::Error;

use taskhub_core::{TenantId, TenantScoped, UserId};

use crate::{IdentityContext, Role};

/// Tenant and ownership metadata of the resource being acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    pub tenant_id: TenantId,
    pub owner_id: Option<UserId>,
    pub assignee_id: Option<UserId>,
}

impl ResourceMeta {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            owner_id: None,
            assignee_id: None,
        }
    }

    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_assignee(mut self, assignee_id: Option<UserId>) -> Self {
        self.assignee_id = assignee_id;
        self
    }

    pub fn of<R: TenantScoped>(resource: &R) -> Self {
        Self {
            tenant_id: resource.tenant_id(),
            owner_id: resource.owner_id(),
            assignee_id: resource.assignee_id(),
        }
    }
}

/// What an operation demands once tenant scope has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any user of the owning tenant.
    TenantMember,
    /// One of the listed roles.
    AnyRole(&'static [Role]),
    /// The resource's owner, or any ADMIN.
    OwnerOrAdmin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Tenant mismatch. Reported the same way as a missing resource.
    #[error("not found")]
    NotFound,

    #[error("forbidden: {0}")]
    Forbidden(String),
}

pub fn same_tenant(ctx: &IdentityContext, resource_tenant_id: TenantId) -> bool {
    ctx.tenant_id() == resource_tenant_id
}

pub fn has_any_role(ctx: &IdentityContext, allowed: &[Role]) -> bool {
    allowed.contains(&ctx.role())
}

pub fn is_owner_or_admin(ctx: &IdentityContext, owner_id: Option<UserId>) -> bool {
    ctx.role().is_admin() || owner_id == Some(ctx.user_id())
}

/// Decide whether `ctx` may act on the resource described by `meta`.
///
/// - No IO
/// - Tenant scope is checked first and short-circuits with `NotFound`
/// - Role/ownership failures within the tenant are `Forbidden`
pub fn authorize(ctx: &IdentityContext, meta: &ResourceMeta, requirement: Requirement) -> Result<(), AuthzError> {
    if !same_tenant(ctx, meta.tenant_id) {
        return Err(AuthzError::NotFound);
    }

    let allowed = match requirement {
        Requirement::TenantMember => true,
        Requirement::AnyRole(roles) => has_any_role(ctx, roles),
        Requirement::OwnerOrAdmin => is_owner_or_admin(ctx, meta.owner_id),
    };

    if allowed {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(denial_message(requirement)))
    }
}

fn role_list(roles: &[Role]) -> String {
    roles.iter().map(Role::as_str).collect::<Vec<_>>().join(" or ")
}

fn denial_message(requirement: Requirement) -> String {
    match requirement {
        Requirement::TenantMember => "not a member of this tenant".to_string(),
        Requirement::AnyRole(roles) => format!("requires role {}", role_list(roles)),
        Requirement::OwnerOrAdmin => "only the owner or an ADMIN may do this".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Auditable record of one authorization decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationExplanation {
    pub granted: bool,
    pub reason: String,
    pub requirement: String,
    pub caller: IdentityContext,
    pub resource: ResourceMeta,
    pub denial: Option<DenialKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    TenantMismatch,
    MissingRole,
    NotOwner,
}

fn describe(requirement: Requirement) -> String {
    match requirement {
        Requirement::TenantMember => "tenant_member".to_string(),
        Requirement::AnyRole(roles) => format!("any_role({})", role_list(roles)),
        Requirement::OwnerOrAdmin => "owner_or_admin".to_string(),
    }
}

/// Explain the decision [`authorize`] makes for the same inputs.
///
/// Never changes the decision; used to log denials.
pub fn explain(ctx: &IdentityContext, meta: &ResourceMeta, requirement: Requirement) -> AuthorizationExplanation {
    let (granted, reason, denial) = match authorize(ctx, meta, requirement) {
        Ok(()) => (true, "granted".to_string(), None),
        Err(AuthzError::NotFound) => (
            false,
            format!(
                "caller tenant {} does not own resource in tenant {}",
                ctx.tenant_id(),
                meta.tenant_id
            ),
            Some(DenialKind::TenantMismatch),
        ),
        Err(AuthzError::Forbidden(msg)) => {
            let kind = match requirement {
                Requirement::AnyRole(_) => DenialKind::MissingRole,
                _ => DenialKind::NotOwner,
            };
            (false, format!("role {}: {msg}", ctx.role()), Some(kind))
        }
    };

    AuthorizationExplanation {
        granted,
        reason,
        requirement: describe(requirement),
        caller: ctx.clone(),
        resource: *meta,
        denial,
    }
}

/// [`authorize`], logging the explanation of any denial at debug level.
pub fn authorize_logged(
    ctx: &IdentityContext,
    meta: &ResourceMeta,
    requirement: Requirement,
) -> Result<(), AuthzError> {
    let result = authorize(ctx, meta, requirement);
    if result.is_err() {
        let explanation = explain(ctx, meta, requirement);
        tracing::debug!(
            user_id = %ctx.user_id(),
            tenant_id = %ctx.tenant_id(),
            denial = ?explanation.denial,
            requirement = %explanation.requirement,
            reason = %explanation.reason,
            "authorization denied"
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    const ADMIN_OR_MANAGER: &[Role] = &[Role::Admin, Role::Manager];

    fn ctx(tenant_id: TenantId, role: Role) -> IdentityContext {
        IdentityContext::new(UserId::new(), tenant_id, role, "u@x.com")
    }

    #[test]
    fn tenant_member_in_same_tenant_is_allowed() {
        let tenant = TenantId::new();
        let caller = ctx(tenant, Role::Member);
        assert_eq!(authorize(&caller, &ResourceMeta::new(tenant), Requirement::TenantMember), Ok(()));
    }

    #[test]
    fn foreign_tenant_is_not_found_even_for_admin() {
        let caller = ctx(TenantId::new(), Role::Admin);
        let meta = ResourceMeta::new(TenantId::new()).with_owner(caller.user_id());

        for requirement in [
            Requirement::TenantMember,
            Requirement::AnyRole(ADMIN_OR_MANAGER),
            Requirement::OwnerOrAdmin,
        ] {
            assert_eq!(authorize(&caller, &meta, requirement), Err(AuthzError::NotFound));
        }
    }

    #[test]
    fn member_is_forbidden_from_role_gated_action() {
        let tenant = TenantId::new();
        let caller = ctx(tenant, Role::Member);
        let err = authorize(&caller, &ResourceMeta::new(tenant), Requirement::AnyRole(ADMIN_OR_MANAGER)).unwrap_err();
        assert!(matches!(err, AuthzError::Forbidden(_)));
    }

    #[test]
    fn ownership_delete_rule() {
        let tenant = TenantId::new();
        let author = ctx(tenant, Role::Member);
        let other_member = ctx(tenant, Role::Member);
        let manager = ctx(tenant, Role::Manager);
        let admin = ctx(tenant, Role::Admin);
        let meta = ResourceMeta::new(tenant).with_owner(author.user_id());

        assert_eq!(authorize(&author, &meta, Requirement::OwnerOrAdmin), Ok(()));
        assert_eq!(authorize(&admin, &meta, Requirement::OwnerOrAdmin), Ok(()));
        assert!(matches!(
            authorize(&other_member, &meta, Requirement::OwnerOrAdmin),
            Err(AuthzError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(&manager, &meta, Requirement::OwnerOrAdmin),
            Err(AuthzError::Forbidden(_))
        ));
    }

    #[test]
    fn assignment_grants_nothing_beyond_tenant_membership() {
        let tenant = TenantId::new();
        let assignee = ctx(tenant, Role::Member);
        let bystander = ctx(tenant, Role::Member);
        let meta = ResourceMeta::new(tenant)
            .with_owner(UserId::new())
            .with_assignee(Some(assignee.user_id()));

        assert_eq!(authorize(&assignee, &meta, Requirement::TenantMember), Ok(()));
        assert_eq!(authorize(&bystander, &meta, Requirement::TenantMember), Ok(()));
        assert!(authorize(&assignee, &meta, Requirement::OwnerOrAdmin).is_err());
    }

    #[test]
    fn explanation_matches_decision() {
        let tenant = TenantId::new();
        let member = ctx(tenant, Role::Member);

        let granted = explain(&member, &ResourceMeta::new(tenant), Requirement::TenantMember);
        assert!(granted.granted);
        assert_eq!(granted.denial, None);

        let foreign = explain(&member, &ResourceMeta::new(TenantId::new()), Requirement::TenantMember);
        assert!(!foreign.granted);
        assert_eq!(foreign.denial, Some(DenialKind::TenantMismatch));

        let missing = explain(&member, &ResourceMeta::new(tenant), Requirement::AnyRole(ADMIN_OR_MANAGER));
        assert_eq!(missing.denial, Some(DenialKind::MissingRole));
        assert_eq!(missing.requirement, "any_role(ADMIN or MANAGER)");
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    fn requirement_strategy() -> impl Strategy<Value = Requirement> {
        prop_oneof![
            Just(Requirement::TenantMember),
            Just(Requirement::AnyRole(ADMIN_OR_MANAGER)),
            Just(Requirement::OwnerOrAdmin),
        ]
    }

    proptest! {
        #[test]
        fn cross_tenant_access_is_always_not_found(
            a in any::<u128>(),
            b in any::<u128>(),
            role in role_strategy(),
            requirement in requirement_strategy(),
            caller_owns in any::<bool>(),
        ) {
            prop_assume!(a != b);
            let caller = IdentityContext::new(UserId::new(), TenantId::from_uuid(Uuid::from_u128(a)), role, "u@x.com");
            let mut meta = ResourceMeta::new(TenantId::from_uuid(Uuid::from_u128(b)));
            if caller_owns {
                meta = meta.with_owner(caller.user_id()).with_assignee(Some(caller.user_id()));
            }

            prop_assert_eq!(authorize(&caller, &meta, requirement), Err(AuthzError::NotFound));
        }
    }
}
