//! `taskhub-auth`: authentication and tenant-scoped authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage: credential
//! persistence is reached through the [`CredentialStore`] contract and every
//! access decision is a pure function of an [`IdentityContext`].

pub mod authorize;
pub mod claims;
pub mod config;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod password;
pub mod resolver;
pub mod roles;
pub mod service;
pub mod token;

pub use authorize::{
    AuthorizationExplanation, AuthzError, DenialKind, Requirement, ResourceMeta, authorize,
    authorize_logged, explain, has_any_role, is_owner_or_admin, same_tenant,
};
pub use claims::{JwtClaims, validate_claims};
pub use config::{AuthConfig, PasswordParams};
pub use credentials::{CredentialStore, NewTenant, NewUser, StoreError, TenantRecord, UserRecord};
pub use error::{AuthError, INVALID_CREDENTIALS_MESSAGE};
pub use identity::IdentityContext;
pub use password::{PasswordError, PasswordHasher};
pub use resolver::{PublicRoutes, extract_bearer, resolve_identity};
pub use roles::{Role, UnknownRole};
pub use service::{AuthOutcome, Authenticator, NewMemberInput, RegisterInput, UserSummary};
pub use token::{InvalidTokenReason, MIN_SECRET_LEN, TokenCodec, TokenError};
