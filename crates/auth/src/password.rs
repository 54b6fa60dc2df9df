//! Password hashing and verification using Argon2id.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _, Version};
use thiserror::Error;

use crate::config::PasswordParams;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("invalid password hashing parameters: {0}")]
    InvalidParams(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// One-way password hasher with a tunable cost.
///
/// Hashes are PHC strings with a fresh random salt, so hashing the same secret
/// twice never yields the same output. Verification reads the cost from the
/// stored hash, so raising the configured cost keeps old hashes valid.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(params: PasswordParams) -> Result<Self, PasswordError> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or an error if
    /// the stored hash cannot be parsed. The digest comparison is constant time.
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self.argon2().verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hashing(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn correct_password_matches() {
        let hasher = hasher();
        let hash = hasher.hash("hunter2").unwrap();
        assert!(hasher.verify("hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hasher = hasher();
        let hash = hasher.hash("hunter2").unwrap();
        assert!(!hasher.verify("hunter3", &hash).unwrap());
    }

    #[test]
    fn same_secret_hashes_differently() {
        let hasher = hasher();
        let a = hasher.hash("pw").unwrap();
        let b = hasher.hash("pw").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn malformed_hash_returns_error() {
        let err = hasher().verify("pw", "not-a-hash").unwrap_err();
        assert!(matches!(err, PasswordError::MalformedHash(_)));
    }

    #[test]
    fn verification_uses_the_cost_stored_in_the_hash() {
        let cheap = hasher();
        let hash = cheap.hash("pw").unwrap();

        let costlier = PasswordHasher::new(PasswordParams {
            memory_kib: 128,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(costlier.verify("pw", &hash).unwrap());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = PasswordHasher::new(PasswordParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, PasswordError::InvalidParams(_)));
    }
}
