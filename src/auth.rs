//! Bearer-token authentication: JWT claims, Argon2 password hashing, and the
//! axum extractors protecting account and admin routes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    dao::models::AccountEntity,
    error::AppError,
    state::SharedState,
};

/// Failures on the authentication path.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header was supplied.
    #[error("missing bearer credentials")]
    MissingCredentials,
    /// The token failed signature or structural validation.
    #[error("invalid bearer token")]
    InvalidToken,
    /// The token was valid once but its expiry has passed.
    #[error("bearer token expired")]
    TokenExpired,
    /// The account behind the token has been deactivated.
    #[error("account is deactivated")]
    AccountInactive,
    /// The route requires the admin role flag.
    #[error("administrator role required")]
    AdminRequired,
    /// Password hashing or verification failed internally.
    #[error("credential processing failed")]
    HashingFailure,
}

/// Claims carried inside issued bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier.
    pub sub: Uuid,
    /// Account handle at issue time, for log correlation only.
    pub handle: String,
    /// Admin role flag at issue time; routes re-check the stored account.
    pub admin: bool,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signing and verification key material derived from the configured secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Derive both keys from a shared secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Mint a token for an account, valid for `ttl`.
    pub fn issue(&self, account: &AccountEntity, ttl: Duration) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: account.id,
            handle: account.handle.clone(),
            admin: account.is_admin,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding).map_err(|_| AuthError::HashingFailure)
    }

    /// Validate a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Hash a raw password with a fresh salt.
pub fn hash_password(raw: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::HashingFailure)
}

/// Check a raw password against a stored hash.
pub fn verify_password(raw: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|_| AuthError::HashingFailure)?;
    Ok(Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok())
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredentials)
}

/// Extractor yielding the authenticated, active account behind the bearer token.
pub struct CurrentAccount(pub AccountEntity);

impl FromRequestParts<SharedState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.token_keys().verify(token)?;

        let store = state.require_pick_store().await.map_err(AppError::from)?;
        let account = store
            .find_account(claims.sub)
            .await
            .map_err(|err| AppError::from(crate::error::ServiceError::from(err)))?
            .ok_or(AuthError::InvalidToken)?;

        if !account.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        Ok(CurrentAccount(account))
    }
}

/// Extractor for admin-only routes; wraps [`CurrentAccount`] and demands the role flag.
pub struct AdminAccount(pub AccountEntity);

impl FromRequestParts<SharedState> for AdminAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentAccount(account) = CurrentAccount::from_request_parts(parts, state).await?;
        if !account.is_admin {
            return Err(AuthError::AdminRequired.into());
        }
        Ok(AdminAccount(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn sample_account() -> AccountEntity {
        AccountEntity {
            id: Uuid::new_v4(),
            handle: "iron_mike".into(),
            email: "mike@example.com".into(),
            password_hash: String::new(),
            is_admin: false,
            is_owner: false,
            is_active: true,
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
        }
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn token_roundtrip_preserves_claims() {
        let keys = TokenKeys::from_secret(b"test-secret");
        let account = sample_account();

        let token = keys
            .issue(&account, Duration::from_secs(3600))
            .expect("token issued");
        let claims = keys.verify(&token).expect("token verifies");

        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.handle, account.handle);
        assert!(!claims.admin);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::from_secret(b"test-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            handle: "stale".into(),
            admin: false,
            iat: now - 600,
            // Past the default validation leeway.
            exp: now - 300,
        };

        let token = keys.sign(&claims).unwrap();
        match keys.verify(&token) {
            Err(AuthError::TokenExpired) => {}
            other => panic!("expected expired-token error, got {other:?}"),
        }
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let keys = TokenKeys::from_secret(b"test-secret");
        let foreign = TokenKeys::from_secret(b"other-secret");
        let account = sample_account();

        let token = foreign.issue(&account, Duration::from_secs(3600)).unwrap();
        match keys.verify(&token) {
            Err(AuthError::InvalidToken) => {}
            other => panic!("expected invalid-token error, got {other:?}"),
        }
    }
}
