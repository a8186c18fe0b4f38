//! Bearer token authentication.
//!
//! Tokens are issued elsewhere; this service only verifies HS256 signatures
//! and expiry, then trusts the `user_id` claim.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
    #[serde(default)]
    pub is_admin: bool,
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("JWT validation failed: {}", e);
                AppError::Unauthorized
            })
    }
}

/// The authenticated caller. Rejects with 401 when the token is missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// The caller if a valid token was presented, otherwise anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeAuth(pub Option<AuthUser>);

impl MaybeAuth {
    pub fn user_id(&self) -> Option<i64> {
        self.0.map(|user| user.user_id)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthUser, AppError> {
    let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
    let claims = state.jwt.verify(token)?;
    Ok(AuthUser {
        user_id: claims.user_id,
    })
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(authenticate(parts, state).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, user_id: i64, exp_offset: i64) -> String {
        let claims = Claims {
            user_id,
            exp: chrono::Utc::now().timestamp() + exp_offset,
            is_admin: false,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn verifies_valid_token() {
        let verifier = JwtVerifier::new("secret");
        let claims = verifier.verify(&token("secret", 7, 3600)).unwrap();
        assert_eq!(claims.user_id, 7);
        assert!(!claims.is_admin);
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = JwtVerifier::new("secret");
        assert!(matches!(
            verifier.verify(&token("other", 7, 3600)),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = JwtVerifier::new("secret");
        assert!(verifier.verify(&token("secret", 7, -3600)).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let verifier = JwtVerifier::new("secret");
        assert!(verifier.verify("not.a.jwt").is_err());
    }

    #[test]
    fn extracts_bearer_token() {
        let (parts, _) = axum::http::Request::builder()
            .header("Authorization", "Bearer abc.def.ghi")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));

        let (parts, _) = axum::http::Request::builder()
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
