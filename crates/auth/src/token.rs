//! Stateless HS256 identity tokens.
//!
//! The codec holds only key material and the configured lifetime; a token's
//! validity is decided entirely by its signature and its `exp` claim.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use thiserror::Error;

use taskhub_core::{TenantId, UserId};

use crate::Role;
use crate::claims::{JwtClaims, validate_claims};

/// Minimum HMAC-SHA256 key length in bytes (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Why a presented token was rejected. Used for logging only; callers see a
/// single [`TokenError::InvalidToken`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTokenReason {
    #[error("malformed token")]
    Malformed,

    #[error("signature mismatch")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken(InvalidTokenReason),

    #[error("signing secret must be at least {min} bytes (got {actual})")]
    WeakSecret { min: usize, actual: usize },

    #[error("token lifetime must be positive")]
    InvalidLifetime,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn reason(&self) -> Option<InvalidTokenReason> {
        match self {
            TokenError::InvalidToken(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Issues and validates signed, time-bounded identity tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from the shared secret.
    ///
    /// Secrets shorter than [`MIN_SECRET_LEN`] are refused so a weak key is
    /// caught at startup rather than silently accepted.
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::WeakSecret {
                min: MIN_SECRET_LEN,
                actual: secret.len(),
            });
        }
        if lifetime.num_seconds() <= 0 {
            return Err(TokenError::InvalidLifetime);
        }

        // Expiry is checked against the caller's `now` in `validate_claims`,
        // so the library's wall-clock check is switched off.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign a token for the given identity, valid from `now` for the
    /// configured lifetime.
    pub fn issue(
        &self,
        user_id: UserId,
        email: &str,
        role: Role,
        tenant_id: TenantId,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = JwtClaims {
            sub: email.to_string(),
            user_id,
            email: email.to_string(),
            role,
            tenant_id,
            iat,
            exp: iat + self.lifetime.num_seconds(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify the signature, then the time window. Nothing from the payload
    /// is trusted before the signature check passes.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature => InvalidTokenReason::BadSignature,
                    ErrorKind::ExpiredSignature => InvalidTokenReason::Expired,
                    _ => InvalidTokenReason::Malformed,
                };
                TokenError::InvalidToken(reason)
            })?;

        validate_claims(&data.claims, now).map_err(TokenError::InvalidToken)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use uuid::Uuid;

    const SECRET: &[u8] = b"an-hmac-secret-that-is-32-bytes!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::seconds(3600)).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    const T0: i64 = 1_700_000_000;

    #[test]
    fn short_secret_is_rejected() {
        let err = TokenCodec::new(b"too-short", Duration::seconds(60)).unwrap_err();
        assert_eq!(err, TokenError::WeakSecret { min: 32, actual: 9 });
    }

    #[test]
    fn non_positive_lifetime_is_rejected() {
        let err = TokenCodec::new(SECRET, Duration::zero()).unwrap_err();
        assert_eq!(err, TokenError::InvalidLifetime);
    }

    #[test]
    fn round_trip_preserves_identity() {
        let codec = codec();
        let user_id = UserId::new();
        let tenant_id = TenantId::new();

        let token = codec.issue(user_id, "a@x.com", Role::Admin, tenant_id, at(T0)).unwrap();
        let claims = codec.validate(&token, at(T0 + 10)).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.tenant_id, tenant_id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iat, T0);
        assert_eq!(claims.exp, T0 + 3600);
    }

    #[test]
    fn expired_token_is_invalid() {
        let codec = codec();
        let token = codec
            .issue(UserId::new(), "a@x.com", Role::Member, TenantId::new(), at(T0))
            .unwrap();

        let err = codec.validate(&token, at(T0 + 3600)).unwrap_err();
        assert_eq!(err, TokenError::InvalidToken(InvalidTokenReason::Expired));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = TokenCodec::new(b"a-completely-different-32b-secret", Duration::seconds(3600)).unwrap();
        let token = other
            .issue(UserId::new(), "a@x.com", Role::Admin, TenantId::new(), at(T0))
            .unwrap();

        let err = codec().validate(&token, at(T0 + 1)).unwrap_err();
        assert_eq!(err, TokenError::InvalidToken(InvalidTokenReason::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = codec().validate("not.a.jwt", at(T0)).unwrap_err();
        assert_eq!(err, TokenError::InvalidToken(InvalidTokenReason::Malformed));
    }

    #[test]
    fn issuing_at_different_instants_yields_different_tokens() {
        let codec = codec();
        let user_id = UserId::new();
        let tenant_id = TenantId::new();

        let first = codec.issue(user_id, "a@x.com", Role::Admin, tenant_id, at(T0)).unwrap();
        let second = codec.issue(user_id, "a@x.com", Role::Admin, tenant_id, at(T0 + 1)).unwrap();

        assert_ne!(first, second);
        assert!(codec.validate(&first, at(T0 + 2)).is_ok());
        assert!(codec.validate(&second, at(T0 + 2)).is_ok());
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn round_trip_holds_until_expiry(
            user in any::<u128>(),
            tenant in any::<u128>(),
            email in "[a-z]{1,12}@[a-z]{1,8}\\.com",
            role in role_strategy(),
            offset in 0i64..3600,
        ) {
            let codec = codec();
            let user_id = UserId::from_uuid(Uuid::from_u128(user));
            let tenant_id = TenantId::from_uuid(Uuid::from_u128(tenant));

            let token = codec.issue(user_id, &email, role, tenant_id, at(T0)).unwrap();
            let claims = codec.validate(&token, at(T0 + offset)).unwrap();

            prop_assert_eq!(claims.user_id, user_id);
            prop_assert_eq!(claims.tenant_id, tenant_id);
            prop_assert_eq!(claims.role, role);
            prop_assert_eq!(claims.email, email);
        }

        #[test]
        fn validation_fails_at_or_after_expiry(late in 3600i64..100_000) {
            let codec = codec();
            let token = codec
                .issue(UserId::new(), "a@x.com", Role::Member, TenantId::new(), at(T0))
                .unwrap();
            prop_assert!(codec.validate(&token, at(T0 + late)).is_err());
        }

        #[test]
        fn any_altered_character_is_detected(index in any::<prop::sample::Index>()) {
            let codec = codec();
            let token = codec
                .issue(UserId::new(), "a@x.com", Role::Admin, TenantId::new(), at(T0))
                .unwrap();

            let mut bytes = token.into_bytes();
            let i = index.index(bytes.len());
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            prop_assert!(codec.validate(&tampered, at(T0 + 1)).is_err());
        }
    }
}
