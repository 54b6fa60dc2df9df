use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use taskhub_auth::{CredentialStore, NewTenant, NewUser, StoreError, TenantRecord, UserRecord};
use taskhub_core::{TenantId, UserId};

#[derive(Debug, Default)]
struct State {
    tenants: HashMap<TenantId, TenantRecord>,
    users: HashMap<UserId, UserRecord>,
    emails: HashMap<String, UserId>,
}

impl State {
    fn insert_user(&mut self, tenant_id: TenantId, user: NewUser, now: DateTime<Utc>) -> UserRecord {
        let record = UserRecord {
            id: UserId::new(),
            tenant_id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.emails.insert(record.email.clone(), record.id);
        self.users.insert(record.id, record.clone());
        record
    }
}

/// In-memory credential store for tests/dev.
///
/// One lock guards tenants, users and the email index together, so the
/// uniqueness check and the inserts of a registration happen as one step.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<State>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("credential store lock poisoned".to_string())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.emails.get(email).and_then(|id| state.users.get(id)).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.emails.contains_key(email))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_tenant(&self, id: TenantId) -> Result<Option<TenantRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.tenants.get(&id).cloned())
    }

    async fn create_tenant_with_admin(
        &self,
        tenant: NewTenant,
        admin: NewUser,
        now: DateTime<Utc>,
    ) -> Result<(TenantRecord, UserRecord), StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        if state.emails.contains_key(&admin.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let tenant = TenantRecord {
            id: TenantId::new(),
            name: tenant.name,
            created_at: now,
            updated_at: now,
        };
        state.tenants.insert(tenant.id, tenant.clone());
        let user = state.insert_user(tenant.id, admin, now);
        Ok((tenant, user))
    }

    async fn create_user(
        &self,
        tenant_id: TenantId,
        user: NewUser,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        if !state.tenants.contains_key(&tenant_id) {
            return Err(StoreError::TenantNotFound);
        }
        if state.emails.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        Ok(state.insert_user(tenant_id, user, now))
    }

    async fn update_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        let existing = state.users.get(&user.id).ok_or(StoreError::UserNotFound)?;

        // Tenant and email are fixed at creation.
        let updated = UserRecord {
            tenant_id: existing.tenant_id,
            email: existing.email.clone(),
            created_at: existing.created_at,
            ..user
        };
        state.users.insert(updated.id, updated.clone());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use taskhub_auth::Role;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            first_name: "F".to_string(),
            last_name: "L".to_string(),
            role,
        }
    }

    fn org(name: &str) -> NewTenant {
        NewTenant { name: name.to_string() }
    }

    #[tokio::test]
    async fn registration_creates_tenant_and_user_together() {
        let store = InMemoryCredentialStore::new();
        let (tenant, user) = store
            .create_tenant_with_admin(org("Org1"), new_user("a@x.com", Role::Admin), Utc::now())
            .await
            .unwrap();

        assert_eq!(user.tenant_id, tenant.id);
        assert_eq!(store.find_tenant(tenant.id).await.unwrap(), Some(tenant));
        assert_eq!(store.find_user_by_email("a@x.com").await.unwrap(), Some(user.clone()));
        assert_eq!(store.find_user_by_id(user.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn duplicate_email_leaves_no_orphan_tenant() {
        let store = InMemoryCredentialStore::new();
        store
            .create_tenant_with_admin(org("Org1"), new_user("a@x.com", Role::Admin), Utc::now())
            .await
            .unwrap();

        let err = store
            .create_tenant_with_admin(org("Org2"), new_user("a@x.com", Role::Admin), Utc::now())
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::DuplicateEmail);
        assert_eq!(store.inner.read().unwrap().tenants.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_registrations_with_one_email_admit_exactly_one() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_tenant_with_admin(org(&format!("Org{i}")), new_user("race@x.com", Role::Admin), Utc::now())
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert_eq!(e, StoreError::DuplicateEmail),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.inner.read().unwrap().tenants.len(), 1);
    }

    #[tokio::test]
    async fn create_user_requires_existing_tenant() {
        let store = InMemoryCredentialStore::new();
        let err = store
            .create_user(TenantId::new(), new_user("m@x.com", Role::Member), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::TenantNotFound);
    }

    #[tokio::test]
    async fn update_user_keeps_tenant_and_email() {
        let store = InMemoryCredentialStore::new();
        let (tenant, user) = store
            .create_tenant_with_admin(org("Org1"), new_user("a@x.com", Role::Admin), Utc::now())
            .await
            .unwrap();

        let mut changed = user.clone();
        changed.role = Role::Manager;
        changed.tenant_id = TenantId::new();
        changed.email = "other@x.com".to_string();

        let updated = store.update_user(changed).await.unwrap();
        assert_eq!(updated.role, Role::Manager);
        assert_eq!(updated.tenant_id, tenant.id);
        assert_eq!(updated.email, "a@x.com");
    }
}
