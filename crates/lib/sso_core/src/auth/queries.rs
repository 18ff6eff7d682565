//! Postgres-backed storage gateway.

use async_trait::async_trait;
use sqlx::PgPool;

use super::storage::{AppProvider, StorageError, UserProvider, UserSaver};
use crate::models::auth::{App, User};

/// Storage gateway over a Postgres connection pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserSaver for PgStorage {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<i64, StorageError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StorageError::UserExists,
            other => StorageError::Db(other),
        })
    }
}

#[async_trait]
impl UserProvider for PgStorage {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let (id, email, password_hash) = row.ok_or(StorageError::UserNotFound)?;
        Ok(User {
            id,
            email,
            password_hash,
        })
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
        sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for PgStorage {
    async fn app(&self, app_id: i32) -> Result<App, StorageError> {
        let row = sqlx::query_as::<_, (i32, String, String)>(
            "SELECT id, name, secret FROM apps WHERE id = $1",
        )
        .bind(app_id)
        .fetch_optional(&self.pool)
        .await?;

        let (id, name, secret) = row.ok_or(StorageError::AppNotFound)?;
        Ok(App { id, name, secret })
    }
}
