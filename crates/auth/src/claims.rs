use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use taskhub_core::{TenantId, UserId};

use crate::Role;
use crate::token::InvalidTokenReason;

/// JWT claims model.
///
/// Carries the identity fields plus the standard `iat`/`exp` timestamps
/// (Unix seconds). `sub` mirrors the email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    pub sub: String,
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub tenant_id: TenantId,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Deterministically validate the time window of JWT claims.
///
/// Expiry is strict (`now < exp`) and no clock skew is tolerated. The
/// issued-at instant is only used to reject an empty or inverted window.
///
/// Note: this validates the *claims* only; signature verification happens in
/// [`crate::TokenCodec::validate`] before this is called.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), InvalidTokenReason> {
    if claims.exp <= claims.iat {
        return Err(InvalidTokenReason::InvalidTimeWindow);
    }
    if now.timestamp() >= claims.exp {
        return Err(InvalidTokenReason::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(iat: i64, exp: i64) -> JwtClaims {
        JwtClaims {
            sub: "a@x.com".to_string(),
            user_id: UserId::new(),
            email: "a@x.com".to_string(),
            role: Role::Member,
            tenant_id: TenantId::new(),
            iat,
            exp,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn valid_inside_window() {
        assert_eq!(validate_claims(&claims(100, 200), at(150)), Ok(()));
        assert_eq!(validate_claims(&claims(100, 200), at(199)), Ok(()));
    }

    #[test]
    fn expired_at_exact_expiry() {
        assert_eq!(
            validate_claims(&claims(100, 200), at(200)),
            Err(InvalidTokenReason::Expired)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert_eq!(
            validate_claims(&claims(200, 200), at(150)),
            Err(InvalidTokenReason::InvalidTimeWindow)
        );
    }

    #[test]
    fn wire_names_are_camel_case() {
        let value = serde_json::to_value(claims(1, 2)).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("tenantId").is_some());
        assert_eq!(value["role"], "MEMBER");
    }
}
