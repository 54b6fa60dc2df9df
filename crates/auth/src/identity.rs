use serde::Serialize;

use taskhub_core::{TenantId, UserId};

use crate::{JwtClaims, Role};

/// The resolved caller of one in-flight request.
///
/// Built from validated token claims and never mutated afterwards. Business
/// operations receive it as an explicit argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityContext {
    user_id: UserId,
    tenant_id: TenantId,
    role: Role,
    email: String,
}

impl IdentityContext {
    pub fn new(user_id: UserId, tenant_id: TenantId, role: Role, email: impl Into<String>) -> Self {
        Self {
            user_id,
            tenant_id,
            role,
            email: email.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl From<JwtClaims> for IdentityContext {
    fn from(claims: JwtClaims) -> Self {
        Self {
            user_id: claims.user_id,
            tenant_id: claims.tenant_id,
            role: claims.role,
            email: claims.email,
        }
    }
}
