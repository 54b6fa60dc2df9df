//! Credential Store contract.
//!
//! Storage of tenants and users lives outside this crate; the authenticator
//! reaches it only through [`CredentialStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use taskhub_core::{TenantId, UserId};

use crate::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    pub id: TenantId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted user. `email` is unique across all tenants; `tenant_id` never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A user with this email already exists (possibly inserted concurrently).
    #[error("email is already registered")]
    DuplicateEmail,

    #[error("tenant not found")]
    TenantNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("credential store failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    async fn find_tenant(&self, id: TenantId) -> Result<Option<TenantRecord>, StoreError>;

    /// Create a tenant and its first user as one unit.
    ///
    /// Either both records become visible or neither does. Fails with
    /// [`StoreError::DuplicateEmail`] if the email is taken.
    async fn create_tenant_with_admin(
        &self,
        tenant: NewTenant,
        admin: NewUser,
        now: DateTime<Utc>,
    ) -> Result<(TenantRecord, UserRecord), StoreError>;

    /// Create a user in an existing tenant.
    async fn create_user(
        &self,
        tenant_id: TenantId,
        user: NewUser,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, StoreError>;

    /// Replace a user's mutable fields (names, role, password hash).
    async fn update_user(&self, user: UserRecord) -> Result<UserRecord, StoreError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        (**self).find_user_by_email(email).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        (**self).email_exists(email).await
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        (**self).find_user_by_id(id).await
    }

    async fn find_tenant(&self, id: TenantId) -> Result<Option<TenantRecord>, StoreError> {
        (**self).find_tenant(id).await
    }

    async fn create_tenant_with_admin(
        &self,
        tenant: NewTenant,
        admin: NewUser,
        now: DateTime<Utc>,
    ) -> Result<(TenantRecord, UserRecord), StoreError> {
        (**self).create_tenant_with_admin(tenant, admin, now).await
    }

    async fn create_user(
        &self,
        tenant_id: TenantId,
        user: NewUser,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, StoreError> {
        (**self).create_user(tenant_id, user, now).await
    }

    async fn update_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        (**self).update_user(user).await
    }
}
