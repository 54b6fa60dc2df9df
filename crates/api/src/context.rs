use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use taskhub_auth::IdentityContext;

use crate::app::errors::ApiError;

/// The caller's identity, as resolved by the identity middleware.
///
/// Fails closed: a handler using this extractor on a request that carries no
/// resolved identity answers 401 instead of running.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub IdentityContext);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(ApiError::Unauthenticated)
    }
}
