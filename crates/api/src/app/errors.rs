use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use taskhub_auth::{AuthError, INVALID_CREDENTIALS_MESSAGE};
use taskhub_core::DomainError;

/// Error returned by every handler.
///
/// Internal details are logged, never sent to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("internal server error")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyExists => ApiError::AlreadyExists("Email already registered".to_string()),
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Unauthenticated => ApiError::Unauthenticated,
            AuthError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            AuthError::Forbidden(msg) => ApiError::Forbidden(msg),
            other @ (AuthError::Token(_) | AuthError::Password(_) | AuthError::Store(_) | AuthError::Internal(_)) => {
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => ApiError::InvalidInput(msg),
            DomainError::NotFound(kind) => ApiError::NotFound(kind),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::Conflict(msg) => ApiError::AlreadyExists(msg),
            DomainError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::AlreadyExists(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed with internal error");
                "internal server error".to_string()
            }
            ApiError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            other => other.to_string(),
        };
        json_error(status, code, message)
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_auth::StoreError;

    #[test]
    fn store_failures_do_not_leak_details() {
        let err: ApiError = AuthError::from(StoreError::Backend("connection refused on 10.0.0.5".to_string())).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("task"), StatusCode::NOT_FOUND),
            (DomainError::forbidden("no"), StatusCode::FORBIDDEN),
            (DomainError::conflict("dup"), StatusCode::CONFLICT),
            (DomainError::storage("disk"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let err = ApiError::from(AuthError::from(StoreError::DuplicateEmail));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
