//! In-memory storage doubles for tests.
//!
//! Available to this crate's unit tests and, through the `testing` feature,
//! to dependent crates' test suites.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::storage::{AppProvider, StorageError, UserProvider, UserSaver};
use crate::models::auth::{App, User};

#[derive(Default)]
struct Inner {
    users: Vec<(User, bool)>,
    apps: HashMap<i32, App>,
}

/// Storage backed by a mutex-guarded map. User IDs start at 1.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision an app.
    pub fn with_app(self, id: i32, name: &str, secret: &str) -> Self {
        self.inner.lock().unwrap().apps.insert(
            id,
            App {
                id,
                name: name.to_string(),
                secret: secret.to_string(),
            },
        );
        self
    }

    /// Set the admin flag. Returns false if the user does not exist.
    pub fn grant_admin(&self, user_id: i64) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.iter_mut().find(|(u, _)| u.id == user_id) {
            Some((_, admin)) => {
                *admin = true;
                true
            }
            None => false,
        }
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }
}

#[async_trait]
impl UserSaver for MemoryStorage {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<i64, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|(u, _)| u.email == email) {
            return Err(StorageError::UserExists);
        }
        let id = inner.users.len() as i64 + 1;
        inner.users.push((
            User {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            },
            false,
        ));
        Ok(id)
    }
}

#[async_trait]
impl UserProvider for MemoryStorage {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone())
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(_, admin)| *admin)
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for MemoryStorage {
    async fn app(&self, app_id: i32) -> Result<App, StorageError> {
        let inner = self.inner.lock().unwrap();
        inner
            .apps
            .get(&app_id)
            .cloned()
            .ok_or(StorageError::AppNotFound)
    }
}

/// Storage whose every call fails as if the database were unreachable.
pub struct FailingStorage;

#[async_trait]
impl UserSaver for FailingStorage {
    async fn save_user(&self, _email: &str, _password_hash: &str) -> Result<i64, StorageError> {
        Err(StorageError::Db(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl UserProvider for FailingStorage {
    async fn user(&self, _email: &str) -> Result<User, StorageError> {
        Err(StorageError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn is_admin(&self, _user_id: i64) -> Result<bool, StorageError> {
        Err(StorageError::Db(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl AppProvider for FailingStorage {
    async fn app(&self, _app_id: i32) -> Result<App, StorageError> {
        Err(StorageError::Db(sqlx::Error::PoolTimedOut))
    }
}
