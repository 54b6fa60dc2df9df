//! Authenticator: registration, login and member provisioning.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use taskhub_core::{TenantId, UserId};

use crate::{
    AuthError, CredentialStore, IdentityContext, NewTenant, NewUser, PasswordHasher, Role, TokenCodec, UserRecord,
};

/// Verified against when the email is unknown, so both login failure paths
/// do the same amount of hashing work.
const DUMMY_PASSWORD: &str = "taskhub-unknown-user-placeholder";

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_name: String,
}

#[derive(Debug, Clone)]
pub struct NewMemberInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: UserId,
    pub tenant_id: TenantId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl From<&UserRecord> for UserSummary {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            tenant_id: user.tenant_id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

/// Result of a successful register or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub tenant_id: TenantId,
}

pub struct Authenticator<S> {
    store: S,
    codec: Arc<TokenCodec>,
    hasher: PasswordHasher,
    dummy_hash: String,
}

impl<S> Authenticator<S>
where
    S: CredentialStore,
{
    pub fn new(store: S, codec: Arc<TokenCodec>, hasher: PasswordHasher) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            codec,
            hasher,
            dummy_hash,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Bootstrap a new tenant with its first user, who is always ADMIN.
    pub async fn register(&self, input: RegisterInput, now: DateTime<Utc>) -> Result<AuthOutcome, AuthError> {
        require_present("email", &input.email)?;
        require_present("password", &input.password)?;
        require_present("organizationName", &input.organization_name)?;

        if self.store.email_exists(&input.email).await? {
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.hash_password(input.password).await?;

        // The store re-checks uniqueness inside its own transaction; a racing
        // registration surfaces there as `AlreadyExists`.
        let (tenant, user) = self
            .store
            .create_tenant_with_admin(
                NewTenant {
                    name: input.organization_name,
                },
                NewUser {
                    email: input.email,
                    password_hash,
                    first_name: input.first_name,
                    last_name: input.last_name,
                    role: Role::Admin,
                },
                now,
            )
            .await?;

        info!(tenant_id = %tenant.id, user_id = %user.id, "tenant registered");

        self.outcome(&user, now)
    }

    /// Check credentials and issue a fresh token.
    ///
    /// Unknown email and wrong password are reported identically.
    pub async fn login(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<AuthOutcome, AuthError> {
        let user = self.store.find_user_by_email(email).await?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };
        let matches = self.verify_password(password.to_string(), stored_hash).await?;

        match user {
            Some(user) if matches => {
                info!(tenant_id = %user.tenant_id, user_id = %user.id, "login succeeded");
                self.outcome(&user, now)
            }
            _ => {
                warn!("login failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Add a user to the caller's own tenant. ADMIN only.
    pub async fn add_member(
        &self,
        ctx: &IdentityContext,
        input: NewMemberInput,
        now: DateTime<Utc>,
    ) -> Result<UserSummary, AuthError> {
        if !ctx.role().is_admin() {
            return Err(AuthError::Forbidden("only an ADMIN may add users".to_string()));
        }
        require_present("email", &input.email)?;
        require_present("password", &input.password)?;

        if self.store.email_exists(&input.email).await? {
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = self
            .store
            .create_user(
                ctx.tenant_id(),
                NewUser {
                    email: input.email,
                    password_hash,
                    first_name: input.first_name,
                    last_name: input.last_name,
                    role: input.role,
                },
                now,
            )
            .await?;

        info!(
            tenant_id = %user.tenant_id,
            user_id = %user.id,
            added_by = %ctx.user_id(),
            role = %user.role,
            "member added"
        );

        Ok(UserSummary::from(&user))
    }

    /// Current stored profile of the caller.
    ///
    /// A token whose user no longer exists in its tenant is treated as
    /// unauthenticated.
    pub async fn profile(&self, ctx: &IdentityContext) -> Result<UserSummary, AuthError> {
        match self.store.find_user_by_id(ctx.user_id()).await? {
            Some(user) if user.tenant_id == ctx.tenant_id() => Ok(UserSummary::from(&user)),
            _ => Err(AuthError::Unauthenticated),
        }
    }

    fn outcome(&self, user: &UserRecord, now: DateTime<Utc>) -> Result<AuthOutcome, AuthError> {
        let token = self
            .codec
            .issue(user.id, &user.email, user.role, user.tenant_id, now)?;

        Ok(AuthOutcome {
            token,
            token_type: "Bearer",
            user_id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            tenant_id: user.tenant_id,
        })
    }

    async fn hash_password(&self, secret: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task failed: {e}")))??;
        Ok(hash)
    }

    async fn verify_password(&self, secret: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&secret, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))??;
        Ok(matches)
    }
}

fn require_present(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}
