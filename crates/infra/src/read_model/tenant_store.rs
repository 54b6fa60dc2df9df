use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use taskhub_core::{DomainError, DomainResult, TenantId, TenantScoped};
use taskhub_tasks::ResourceStore;

/// In-memory resource store for tests/dev.
///
/// Records are keyed by their own id; `list` filters on the tenant each
/// record carries.
#[derive(Debug)]
pub struct InMemoryResourceStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryResourceStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryResourceStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> DomainError {
    DomainError::storage("resource store lock poisoned")
}

impl<K, V> ResourceStore<K, V> for InMemoryResourceStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: TenantScoped + Clone + Send + Sync + 'static,
{
    fn get(&self, id: &K) -> DomainResult<Option<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    fn upsert(&self, id: K, value: V) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(id, value);
        Ok(())
    }

    fn remove(&self, id: &K) -> DomainResult<Option<V>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(id))
    }

    fn list(&self, tenant_id: TenantId) -> DomainResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().filter(|v| v.tenant_id() == tenant_id).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskhub_core::{ProjectId, UserId};
    use taskhub_tasks::Project;

    fn project(tenant_id: TenantId) -> Project {
        let now = Utc::now();
        Project {
            id: ProjectId::new(),
            tenant_id,
            name: "p".to_string(),
            description: None,
            created_by: UserId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn list_is_tenant_isolated() {
        let store = InMemoryResourceStore::new();
        let a = TenantId::new();
        let b = TenantId::new();
        let pa = project(a);
        let pb = project(b);
        store.upsert(pa.id, pa.clone()).unwrap();
        store.upsert(pb.id, pb.clone()).unwrap();

        assert_eq!(store.list(a).unwrap(), vec![pa.clone()]);
        assert_eq!(store.list(b).unwrap(), vec![pb]);
        assert_eq!(store.get(&pa.id).unwrap(), Some(pa.clone()));
        assert_eq!(store.remove(&pa.id).unwrap(), Some(pa));
        assert!(store.list(a).unwrap().is_empty());
    }

    #[test]
    fn poisoned_lock_is_a_storage_error() {
        let store = InMemoryResourceStore::<ProjectId, Project>::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.inner.write().unwrap();
            panic!("writer died holding the lock");
        }));

        let p = project(TenantId::new());
        assert!(matches!(store.upsert(p.id, p.clone()), Err(DomainError::Storage(_))));
        assert!(matches!(store.get(&p.id), Err(DomainError::Storage(_))));
        assert!(matches!(store.remove(&p.id), Err(DomainError::Storage(_))));
        assert!(matches!(store.list(p.tenant_id), Err(DomainError::Storage(_))));
    }
}
