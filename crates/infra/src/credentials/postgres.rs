//! Postgres-backed credential store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `DuplicateEmail` |
//! | Database (foreign key violation) | `23503` | `TenantNotFound` |
//! | anything else | | `Backend` |
//!
//! ## Atomic Registration
//!
//! `create_tenant_with_admin` inserts the tenant and its first user in one
//! transaction. The unique index on `users.email` is the final arbiter of
//! email uniqueness: a concurrent registration that loses the race rolls back
//! its tenant insert along with the failed user insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::instrument;
use uuid::Uuid;

use taskhub_auth::{CredentialStore, NewTenant, NewUser, Role, StoreError, TenantRecord, UserRecord};
use taskhub_core::{TenantId, UserId};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tenants (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id             UUID PRIMARY KEY,
        tenant_id      UUID NOT NULL REFERENCES tenants (id),
        email          TEXT NOT NULL,
        password_hash  TEXT NOT NULL,
        first_name     TEXT NOT NULL,
        last_name      TEXT NOT NULL,
        role           TEXT NOT NULL CHECK (role IN ('ADMIN', 'MANAGER', 'MEMBER')),
        created_at     TIMESTAMPTZ NOT NULL,
        updated_at     TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)",
    "CREATE INDEX IF NOT EXISTS users_tenant_id_idx ON users (tenant_id)",
];

const USER_COLUMNS: &str =
    "id, tenant_id, email, password_hash, first_name, last_name, role, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the tables and indexes if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    async fn insert_user<'e, E>(
        executor: E,
        tenant_id: TenantId,
        user: NewUser,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, StoreError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
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

        sqlx::query(
            r#"
            INSERT INTO users (id, tenant_id, email, password_hash, first_name, last_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(*record.id.as_uuid())
        .bind(*record.tenant_id.as_uuid())
        .bind(record.email.clone())
        .bind(record.password_hash.clone())
        .bind(record.first_name.clone())
        .bind(record.last_name.clone())
        .bind(record.role.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(executor)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;

        Ok(record)
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[instrument(skip_all)]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip_all)]
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1) AS taken")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("email_exists", e))?;

        row.try_get::<bool, _>("taken")
            .map_err(|e| map_sqlx_error("email_exists", e))
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_id", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), fields(tenant_id = %id))]
    async fn find_tenant(&self, id: TenantId) -> Result<Option<TenantRecord>, StoreError> {
        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM tenants WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_tenant", e))?;

        row.as_ref().map(tenant_from_row).transpose()
    }

    #[instrument(skip_all)]
    async fn create_tenant_with_admin(
        &self,
        tenant: NewTenant,
        admin: NewUser,
        now: DateTime<Utc>,
    ) -> Result<(TenantRecord, UserRecord), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let tenant = TenantRecord {
            id: TenantId::new(),
            name: tenant.name,
            created_at: now,
            updated_at: now,
        };

        sqlx::query("INSERT INTO tenants (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)")
            .bind(*tenant.id.as_uuid())
            .bind(&tenant.name)
            .bind(tenant.created_at)
            .bind(tenant.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_tenant", e))?;

        // Dropping `tx` on error rolls the tenant insert back.
        let user = Self::insert_user(&mut *tx, tenant.id, admin, now).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok((tenant, user))
    }

    #[instrument(skip(self, user, now), fields(tenant_id = %tenant_id))]
    async fn create_user(
        &self,
        tenant_id: TenantId,
        user: NewUser,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, StoreError> {
        Self::insert_user(&self.pool, tenant_id, user, now).await
    }

    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn update_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET password_hash = $2, first_name = $3, last_name = $4, role = $5, updated_at = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(*user.id.as_uuid())
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_user", e))?;

        match row {
            Some(row) => user_from_row(&row),
            None => Err(StoreError::UserNotFound),
        }
    }
}

fn tenant_from_row(row: &PgRow) -> Result<TenantRecord, StoreError> {
    let decode = |e| map_sqlx_error("decode_tenant", e);
    Ok(TenantRecord {
        id: TenantId::from_uuid(row.try_get::<Uuid, _>("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StoreError> {
    let decode = |e| map_sqlx_error("decode_user", e);
    let role: String = row.try_get("role").map_err(decode)?;
    let role = role
        .parse::<Role>()
        .map_err(|e| StoreError::Backend(format!("decode_user: {e}")))?;

    Ok(UserRecord {
        id: UserId::from_uuid(row.try_get::<Uuid, _>("id").map_err(decode)?),
        tenant_id: TenantId::from_uuid(row.try_get::<Uuid, _>("tenant_id").map_err(decode)?),
        email: row.try_get("email").map_err(decode)?,
        password_hash: row.try_get("password_hash").map_err(decode)?,
        first_name: row.try_get("first_name").map_err(decode)?,
        last_name: row.try_get("last_name").map_err(decode)?,
        role,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => StoreError::DuplicateEmail,
            Some("23503") => StoreError::TenantNotFound,
            _ => StoreError::Backend(format!("database error in {}: {}", operation, db_err.message())),
        },
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {}", operation)),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
