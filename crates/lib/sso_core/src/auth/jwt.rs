//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the secret of the app they are issued
//! for, so a token minted for one app never verifies against another.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::AuthError;
use crate::models::auth::{App, TokenClaims, User};

/// Issue a session token for `user` in `app`, valid for `ttl` from now.
pub fn issue_token(user: &User, app: &App, ttl: Duration) -> Result<String, AuthError> {
    issue_token_at(user, app, ttl, Utc::now())
}

/// Issue a session token as if the current instant were `now`.
pub fn issue_token_at(
    user: &User,
    app: &App,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    if app.secret.is_empty() {
        return Err(AuthError::internal("jwt.issue", "empty signing secret"));
    }
    let ttl = chrono::Duration::from_std(ttl).map_err(|e| AuthError::internal("jwt.issue", e))?;
    let exp = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::internal("jwt.issue", "expiry out of range"))?;

    let claims = TokenClaims {
        uid: user.id,
        email: user.email.clone(),
        app_id: app.id,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(app.secret.as_bytes()),
    )
    .map_err(|e| AuthError::internal("jwt.issue", e))
}

/// Verify a session token against an app secret, returning the claims on
/// success.
pub fn verify_token(token: &str, secret: &[u8]) -> Option<TokenClaims> {
    verify_token_at(token, secret, Utc::now())
}

/// Verify a session token as if the current instant were `at`.
///
/// No leeway: a token is rejected from the second its `exp` is reached.
pub fn verify_token_at(token: &str, secret: &[u8], at: DateTime<Utc>) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against `at` rather than the system clock.
    validation.validate_exp = false;
    let claims = decode::<TokenClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)?;
    (at.timestamp() < claims.exp).then_some(claims)
}
