//! Authentication domain models.
//!
//! These are internal domain models, distinct from the request/response
//! shapes the transport layer puts on the wire.

use serde::{Deserialize, Serialize};

/// Registered user.
///
/// `password_hash` is a bcrypt hash in modular-crypt form. It is never
/// serialized.
#[derive(Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Client application. Provisioned out of band; read-only here.
#[derive(Clone)]
pub struct App {
    pub id: i32,
    pub name: String,
    /// HS256 signing secret for tokens issued to this app.
    pub secret: String,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// JWT claims embedded in session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID.
    pub uid: i64,
    /// User email.
    pub email: String,
    /// App the token was issued for.
    pub app_id: i32,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
