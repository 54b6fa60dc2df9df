use thiserror::Error;

use crate::{PasswordError, StoreError, TokenError};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email is already registered")]
    AlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateEmail => AuthError::AlreadyExists,
            other => AuthError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_from_store_becomes_already_exists() {
        let err: AuthError = StoreError::DuplicateEmail.into();
        assert!(matches!(err, AuthError::AlreadyExists));
    }

    #[test]
    fn invalid_credentials_message_is_fixed() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid email or password");
    }
}
