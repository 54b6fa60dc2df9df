//! Server configuration.

use clap::Parser;
use thiserror::Error;

use taskhub_auth::{AuthConfig, PasswordParams};
use taskhub_observability::LogFormat;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_EXPIRATION_SECS out of range: {0}")]
    TokenLifetimeOutOfRange(i64),
}

/// taskhub API server configuration
#[derive(Debug, Parser)]
#[command(name = "taskhub-api", about = "Multi-tenant task management API", long_about = None)]
pub struct ServerConfig {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// HMAC secret for signing tokens (at least 32 bytes)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Token lifetime in seconds
    #[arg(long, env = "JWT_EXPIRATION_SECS", default_value = "86400")]
    pub jwt_expiration_secs: i64,

    /// Argon2id memory cost in KiB
    #[arg(long, env = "PASSWORD_HASH_MEMORY_KIB", default_value = "19456")]
    pub password_hash_memory_kib: u32,

    /// Argon2id iterations
    #[arg(long, env = "PASSWORD_HASH_ITERATIONS", default_value = "2")]
    pub password_hash_iterations: u32,

    /// Argon2id parallelism
    #[arg(long, env = "PASSWORD_HASH_PARALLELISM", default_value = "1")]
    pub password_hash_parallelism: u32,

    /// `PostgreSQL` connection string; credentials are kept in memory when unset
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Log output format (json or pretty)
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// # Errors
    ///
    /// Returns an error if the token lifetime cannot be represented
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        let token_lifetime = chrono::Duration::try_seconds(self.jwt_expiration_secs)
            .ok_or(ConfigError::TokenLifetimeOutOfRange(self.jwt_expiration_secs))?;

        Ok(AuthConfig {
            jwt_secret: self.jwt_secret.clone().into_bytes(),
            token_lifetime,
            password: PasswordParams {
                memory_kib: self.password_hash_memory_kib,
                iterations: self.password_hash_iterations,
                parallelism: self.password_hash_parallelism,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_secret_given() {
        let config = ServerConfig::try_parse_from([
            "taskhub-api",
            "--jwt-secret",
            "an-hmac-secret-that-is-32-bytes!",
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_expiration_secs, 86_400);
        assert_eq!(config.log_format, LogFormat::Json);

        let auth = config.auth_config().unwrap();
        assert_eq!(auth.token_lifetime, chrono::Duration::hours(24));
        assert_eq!(auth.password, PasswordParams::default());
    }

    #[test]
    fn rejects_unknown_log_format() {
        let result = ServerConfig::try_parse_from([
            "taskhub-api",
            "--jwt-secret",
            "an-hmac-secret-that-is-32-bytes!",
            "--log-format",
            "xml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_token_lifetime_is_a_config_error() {
        let config = ServerConfig::try_parse_from([
            "taskhub-api",
            "--jwt-secret",
            "an-hmac-secret-that-is-32-bytes!",
            "--jwt-expiration-secs",
            "9223372036854775807",
        ])
        .unwrap();

        assert_eq!(
            config.auth_config().unwrap_err(),
            ConfigError::TokenLifetimeOutOfRange(i64::MAX)
        );
    }
}
