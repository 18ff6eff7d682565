//! Authentication logic.
//!
//! Password hashing, session token issuance, the storage gateway contract
//! and the [`service::Auth`] orchestrator built on top of them.

pub mod jwt;
pub mod password;
pub mod queries;
pub mod service;
pub mod storage;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use thiserror::Error;

/// Authentication errors surfaced by the auth service.
///
/// Every variant except [`AuthError::Internal`] is safe to show to callers
/// verbatim. `Internal` keeps its detail in `reason` for logging only; its
/// `Display` never includes it.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid app id")]
    InvalidAppId,

    #[error("User already exists")]
    UserExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error in {op}")]
    Internal { op: &'static str, reason: String },
}

impl AuthError {
    pub(crate) fn internal(op: &'static str, reason: impl std::fmt::Display) -> Self {
        AuthError::Internal {
            op,
            reason: reason.to_string(),
        }
    }

    /// Stable category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AuthError::InvalidAppId => ErrorKind::InvalidAppId,
            AuthError::UserExists => ErrorKind::UserExists,
            AuthError::UserNotFound => ErrorKind::UserNotFound,
            AuthError::Internal { .. } => ErrorKind::Internal,
        }
    }
}

/// Error category exposed across the core boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCredentials,
    InvalidAppId,
    UserExists,
    UserNotFound,
    Internal,
}

impl ErrorKind {
    /// Machine-readable code, stable across releases.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidCredentials => "invalid_credentials",
            ErrorKind::InvalidAppId => "invalid_app_id",
            ErrorKind::UserExists => "user_exists",
            ErrorKind::UserNotFound => "user_not_found",
            ErrorKind::Internal => "internal",
        }
    }
}
