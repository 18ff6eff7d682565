//! Storage gateway contract consumed by the auth service.
//!
//! Each capability is its own trait so a single backend may implement all
//! of them (see [`super::queries::PgStorage`]) while tests substitute each
//! one independently.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::auth::{App, User};

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("app not found")]
    AppNotFound,

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Persists new users.
#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Create a user and return its new ID.
    ///
    /// Must be atomic: either the user exists afterwards with exactly this
    /// email and hash, or nothing was written. Returns
    /// [`StorageError::UserExists`] when the email is taken.
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<i64, StorageError>;
}

/// Reads users and their admin flag.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Look a user up by exact email. [`StorageError::UserNotFound`] if absent.
    async fn user(&self, email: &str) -> Result<User, StorageError>;

    /// Admin flag for a user. [`StorageError::UserNotFound`] if absent.
    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError>;
}

/// Reads client applications.
#[async_trait]
pub trait AppProvider: Send + Sync {
    /// Look an app up by ID. [`StorageError::AppNotFound`] if absent.
    async fn app(&self, app_id: i32) -> Result<App, StorageError>;
}
