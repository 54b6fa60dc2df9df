use std::str::FromStr;

use axum::{
    routing::{get, post},
    Router,
};

use taskhub_core::DomainError;

use crate::app::errors::ApiError;

pub mod auth;
pub mod comments;
pub mod projects;
pub mod system;
pub mod tasks;
pub mod users;

/// Every route under `/api`. Which of them need a token is decided by the
/// identity middleware's allow-list.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/me", get(system::me))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users", post(users::add_user))
        .nest("/projects", projects::router())
        .nest("/tasks", tasks::router())
}

/// Parse a path segment into a typed id; malformed ids are a 400.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(ApiError::from)
}
