//! Service wiring: credential store, token codec, password hasher and the
//! tenant-scoped workspace.

use std::sync::Arc;

use tracing::info;

use taskhub_auth::{AuthConfig, AuthError, Authenticator, CredentialStore, PasswordHasher, TokenCodec};
use taskhub_infra::{InMemoryCredentialStore, InMemoryResourceStore, PostgresCredentialStore};
use taskhub_tasks::Workspace;

pub type SharedCredentialStore = Arc<dyn CredentialStore>;

/// Everything a handler needs, shared across requests.
pub struct AppServices {
    pub auth: Authenticator<SharedCredentialStore>,
    pub workspace: Workspace,
    pub codec: Arc<TokenCodec>,
}

impl AppServices {
    /// Wire services from configuration.
    ///
    /// With a database URL, credentials live in Postgres (schema created on
    /// startup); otherwise everything is kept in memory.
    pub async fn build(config: &AuthConfig, database_url: Option<&str>) -> Result<Self, AuthError> {
        let store: SharedCredentialStore = match database_url {
            Some(url) => {
                let store = PostgresCredentialStore::connect(url).await?;
                store.ensure_schema().await?;
                info!("using postgres credential store");
                Arc::new(store)
            }
            None => {
                info!("using in-memory credential store");
                Arc::new(InMemoryCredentialStore::new())
            }
        };
        Self::with_store(config, store)
    }

    pub fn in_memory(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::with_store(config, Arc::new(InMemoryCredentialStore::new()))
    }

    fn with_store(config: &AuthConfig, store: SharedCredentialStore) -> Result<Self, AuthError> {
        let codec = Arc::new(TokenCodec::new(&config.jwt_secret, config.token_lifetime)?);
        let hasher = PasswordHasher::new(config.password)?;
        let auth = Authenticator::new(store, codec.clone(), hasher)?;

        let workspace = Workspace::new(
            Arc::new(InMemoryResourceStore::new()),
            Arc::new(InMemoryResourceStore::new()),
            Arc::new(InMemoryResourceStore::new()),
        );

        Ok(Self { auth, workspace, codec })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_secret_fails_wiring() {
        let config = AuthConfig::new("short");
        assert!(matches!(AppServices::in_memory(&config), Err(AuthError::Token(_))));
    }
}
