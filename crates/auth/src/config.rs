//! Authentication configuration.

use chrono::Duration;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    /// Memory cost in KiB (default: 19456 = 19 MiB).
    pub memory_kib: u32,
    /// Number of passes (default: 2).
    pub iterations: u32,
    /// Degree of parallelism (default: 1).
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Configuration for the authentication core.
///
/// Loaded once at startup and shared immutably afterwards.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret used to sign and verify tokens.
    pub jwt_secret: Vec<u8>,
    /// Token lifetime (default: 24 hours).
    pub token_lifetime: Duration,
    pub password: PasswordParams,
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("password", &self.password)
            .finish()
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime: Duration::hours(24),
            password: PasswordParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_secret() {
        let config = AuthConfig::new("super-secret-value-that-is-long-enough");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
