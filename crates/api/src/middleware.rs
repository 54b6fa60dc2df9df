use std::sync::Arc;

use axum::{
    extract::State,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use taskhub_auth::{PublicRoutes, TokenCodec, resolve_identity};

use crate::app::errors::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
    pub public: Arc<PublicRoutes>,
}

/// Resolve the bearer token into an `IdentityContext` for this request only.
///
/// Allow-listed paths pass through untouched; every other request without a
/// valid token is answered with 401 before reaching a handler.
pub async fn identity_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if state.public.is_public(req.uri().path()) {
        return next.run(req).await;
    }

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match resolve_identity(header, &state.codec, Utc::now()) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(_) => ApiError::Unauthenticated.into_response(),
    }
}
