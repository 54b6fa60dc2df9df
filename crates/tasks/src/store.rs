use std::sync::Arc;

use taskhub_core::{DomainResult, TenantId};

/// Key/value store for tenant-scoped resources.
///
/// Lookups by id are global: callers must run the tenant check on whatever
/// comes back before using it. Backend failures surface as
/// `DomainError::Storage`.
pub trait ResourceStore<K, V>: Send + Sync {
    fn get(&self, id: &K) -> DomainResult<Option<V>>;
    fn upsert(&self, id: K, value: V) -> DomainResult<()>;
    fn remove(&self, id: &K) -> DomainResult<Option<V>>;
    /// All records owned by `tenant_id`, in no particular order.
    fn list(&self, tenant_id: TenantId) -> DomainResult<Vec<V>>;
}

impl<K, V, S> ResourceStore<K, V> for Arc<S>
where
    S: ResourceStore<K, V> + ?Sized,
{
    fn get(&self, id: &K) -> DomainResult<Option<V>> {
        (**self).get(id)
    }

    fn upsert(&self, id: K, value: V) -> DomainResult<()> {
        (**self).upsert(id, value)
    }

    fn remove(&self, id: &K) -> DomainResult<Option<V>> {
        (**self).remove(id)
    }

    fn list(&self, tenant_id: TenantId) -> DomainResult<Vec<V>> {
        (**self).list(tenant_id)
    }
}
