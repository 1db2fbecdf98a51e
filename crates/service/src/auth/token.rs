//! Application-scoped session tokens: HS256 JWTs signed with the issuing
//! application's own secret.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{App, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    pub app_id: i32,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Whether the token is still live at `unix_secs`. `exp` is exclusive:
    /// a token is already expired at the second named by `exp`.
    pub fn is_valid_at(&self, unix_secs: i64) -> bool {
        unix_secs < self.exp
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Mints a signed, time-bounded token binding `user` to `app`.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User, app: &App, ttl: Duration) -> Result<String, TokenError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JwtIssuer;

impl JwtIssuer {
    pub fn new() -> Self {
        Self
    }

    /// Issue as if the current time were `now`.
    pub fn issue_at(&self, user: &User, app: &App, ttl: Duration, now: DateTime<Utc>) -> Result<String, TokenError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::Signing("ttl out of range".into()))?;
        let iat = now.timestamp();
        let exp = iat.checked_add(ttl_secs).ok_or_else(|| TokenError::Signing("expiry out of range".into()))?;
        let claims = Claims { sub: user.id, email: user.email.clone(), app_id: app.id, iat, exp };
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(app.secret.as_bytes()))
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(user, app, ttl, Utc::now())
    }
}

/// Verify signature and expiry against the wall clock, with the same
/// exclusive `exp` as [`Claims::is_valid_at`].
pub fn verify_token(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    verify_token_at(token, secret, Utc::now().timestamp())
}

/// Verify the signature, then judge expiry at `unix_secs` instead of the wall clock.
pub fn verify_token_at(token: &str, secret: &[u8], unix_secs: i64) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| TokenError::Invalid(e.to_string()))?;
    if claims.is_valid_at(unix_secs) {
        Ok(claims)
    } else {
        Err(TokenError::Expired)
    }
}
