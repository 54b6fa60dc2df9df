//! Entity traits: identity, and the tenant boundary every stored resource carries.

use crate::id::{TenantId, UserId};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// A resource that belongs to exactly one tenant.
///
/// The tenant id is set once at creation from the creator's identity and never
/// changes. `owner_id` and `assignee_id` feed ownership checks.
pub trait TenantScoped: Entity {
    fn tenant_id(&self) -> TenantId;

    /// Creator/author of the resource, if the resource has one.
    fn owner_id(&self) -> Option<UserId> {
        None
    }

    fn assignee_id(&self) -> Option<UserId> {
        None
    }
}
