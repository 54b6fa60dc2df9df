//! Request Identity Resolver.
//!
//! Transport-agnostic: callers hand over the raw `Authorization` header value
//! and the request path; HTTP plumbing lives in the API crate.

use chrono::{DateTime, Utc};

use crate::{AuthError, IdentityContext, TokenCodec};

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::Unauthenticated)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }

    Ok(token)
}

/// Resolve the caller's identity from the raw header value.
///
/// Every failure collapses into [`AuthError::Unauthenticated`]; the precise
/// token rejection reason is only logged.
pub fn resolve_identity(
    header: Option<&str>,
    codec: &TokenCodec,
    now: DateTime<Utc>,
) -> Result<IdentityContext, AuthError> {
    let token = extract_bearer(header)?;

    let claims = codec.validate(token, now).map_err(|e| {
        tracing::debug!(reason = ?e.reason(), "bearer token rejected");
        AuthError::Unauthenticated
    })?;

    Ok(IdentityContext::from(claims))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RouteRule {
    Exact(String),
    Prefix(String),
}

/// Fixed allow-list of paths reachable without a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRoutes {
    rules: Vec<RouteRule>,
}

impl PublicRoutes {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn exact(mut self, path: impl Into<String>) -> Self {
        self.rules.push(RouteRule::Exact(path.into()));
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rules.push(RouteRule::Prefix(prefix.into()));
        self
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| match rule {
            RouteRule::Exact(p) => path == p,
            RouteRule::Prefix(p) => path.starts_with(p.as_str()),
        })
    }
}

impl Default for PublicRoutes {
    /// Auth endpoints, the health check and API docs.
    fn default() -> Self {
        Self::empty()
            .prefix("/api/auth/")
            .exact("/api/health")
            .prefix("/swagger-ui")
            .prefix("/v3/api-docs")
            .prefix("/swagger-resources")
            .prefix("/webjars")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use chrono::{Duration, TimeZone};
    use taskhub_core::{TenantId, UserId};

    const SECRET: &[u8] = b"an-hmac-secret-that-is-32-bytes!";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn extract_bearer_accepts_well_formed_header() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn extract_bearer_rejects_missing_or_malformed() {
        for header in [None, Some(""), Some("Bearer "), Some("Basic abc"), Some("bearer abc")] {
            assert!(matches!(extract_bearer(header), Err(AuthError::Unauthenticated)));
        }
    }

    #[test]
    fn resolves_identity_from_valid_token() {
        let codec = TokenCodec::new(SECRET, Duration::hours(1)).unwrap();
        let user_id = UserId::new();
        let tenant_id = TenantId::new();
        let token = codec
            .issue(user_id, "a@x.com", Role::Manager, tenant_id, at(1_000))
            .unwrap();
        let header = format!("Bearer {token}");

        let ctx = resolve_identity(Some(&header), &codec, at(1_001)).unwrap();
        assert_eq!(ctx.user_id(), user_id);
        assert_eq!(ctx.tenant_id(), tenant_id);
        assert_eq!(ctx.role(), Role::Manager);
        assert_eq!(ctx.email(), "a@x.com");
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let codec = TokenCodec::new(SECRET, Duration::hours(1)).unwrap();
        let token = codec
            .issue(UserId::new(), "a@x.com", Role::Admin, TenantId::new(), at(1_000))
            .unwrap();
        let header = format!("Bearer {token}");

        let err = resolve_identity(Some(&header), &codec, at(1_000 + 3_600)).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[test]
    fn default_public_routes() {
        let routes = PublicRoutes::default();
        assert!(routes.is_public("/api/auth/login"));
        assert!(routes.is_public("/api/auth/register"));
        assert!(routes.is_public("/api/health"));
        assert!(routes.is_public("/swagger-ui/index.html"));
        assert!(routes.is_public("/v3/api-docs"));

        assert!(!routes.is_public("/api/health/details"));
        assert!(!routes.is_public("/api/projects"));
        assert!(!routes.is_public("/api/authx"));
        assert!(!routes.is_public("/api/me"));
    }
}
