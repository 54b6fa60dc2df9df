//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: credential store, token codec and workspace wiring
//! - `routes/`: HTTP handlers, one file per resource
//! - `dto.rs`: request DTOs and their validation
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use taskhub_auth::PublicRoutes;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// The identity middleware wraps every route; the allow-list decides which
/// paths skip it.
pub fn build_app(services: AppServices) -> Router {
    let auth_state = middleware::AuthState {
        codec: services.codec.clone(),
        public: Arc::new(PublicRoutes::default()),
    };

    Router::new()
        .nest("/api", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(Arc::new(services)))
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::identity_middleware,
                )),
        )
}
