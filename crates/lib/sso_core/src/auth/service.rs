//! Auth service: login, registration and admin lookup.
//!
//! Stateless across calls: every operation borrows storage through the
//! capability traits in [`super::storage`] for its own duration only.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, Span, error, info, info_span, warn};

use super::storage::{AppProvider, StorageError, UserProvider, UserSaver};
use super::password::{hash_password, verify_password, verify_unknown_user};
use super::{AuthError, jwt};

/// Orchestrates credential checks, storage and token issuance.
pub struct Auth {
    span: Span,
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    token_ttl: Duration,
}

impl Auth {
    /// Create the service.
    ///
    /// `span` is the parent of every span this service opens; pass
    /// `Span::current()` or a dedicated `info_span!` from the caller.
    pub fn new(
        span: Span,
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            span,
            user_saver,
            user_provider,
            app_provider,
            token_ttl,
        }
    }

    /// Lifetime of tokens issued by [`Auth::login`].
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Authenticate with email + password and issue a token for `app_id`.
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> Result<String, AuthError> {
        const OP: &str = "auth.login";
        let span = info_span!(parent: &self.span, "login", op = OP, email, app_id);

        async move {
            info!("attempting to login");

            let user = match self.user_provider.user(email).await {
                Ok(user) => user,
                Err(StorageError::UserNotFound) => {
                    warn!("user not found");
                    let candidate = password.to_owned();
                    tokio::task::spawn_blocking(move || verify_unknown_user(&candidate))
                        .await
                        .map_err(|e| internal(OP, e))?;
                    return Err(AuthError::InvalidCredentials);
                }
                Err(e) => return Err(internal(OP, e)),
            };

            let candidate = password.to_owned();
            let hash = user.password_hash.clone();
            let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
                .await
                .map_err(|e| internal(OP, e))?;
            if !matches {
                warn!(user_id = user.id, "invalid password");
                return Err(AuthError::InvalidCredentials);
            }

            let app = match self.app_provider.app(app_id).await {
                Ok(app) => app,
                Err(StorageError::AppNotFound) => {
                    warn!("app not found");
                    return Err(AuthError::InvalidAppId);
                }
                Err(e) => return Err(internal(OP, e)),
            };

            let token = jwt::issue_token(&user, &app, self.token_ttl)
                .map_err(|e| internal(OP, reason(e)))?;

            info!(user_id = user.id, "user logged in");
            Ok(token)
        }
        .instrument(span)
        .await
    }

    /// Register a new user, returning the assigned user ID.
    pub async fn register_new_user(&self, email: &str, password: &str) -> Result<i64, AuthError> {
        const OP: &str = "auth.register_new_user";
        let span = info_span!(parent: &self.span, "register_new_user", op = OP, email);

        async move {
            info!("registering user");

            let plaintext = password.to_owned();
            let hash = tokio::task::spawn_blocking(move || hash_password(&plaintext))
                .await
                .map_err(|e| internal(OP, e))?
                .map_err(|e| internal(OP, reason(e)))?;

            let user_id = match self.user_saver.save_user(email, &hash).await {
                Ok(id) => id,
                Err(StorageError::UserExists) => {
                    warn!("user already exists");
                    return Err(AuthError::UserExists);
                }
                Err(e) => return Err(internal(OP, e)),
            };

            info!(user_id, "user registered");
            Ok(user_id)
        }
        .instrument(span)
        .await
    }

    /// Whether `user_id` has the admin flag.
    pub async fn is_admin(&self, user_id: i64) -> Result<bool, AuthError> {
        const OP: &str = "auth.is_admin";
        let span = info_span!(parent: &self.span, "is_admin", op = OP, user_id);

        async move {
            info!("checking admin flag");

            let is_admin = match self.user_provider.is_admin(user_id).await {
                Ok(flag) => flag,
                Err(StorageError::UserNotFound) => {
                    warn!("user not found");
                    return Err(AuthError::UserNotFound);
                }
                Err(e) => return Err(internal(OP, e)),
            };

            info!(is_admin, "checked admin flag");
            Ok(is_admin)
        }
        .instrument(span)
        .await
    }
}

/// Log an unexpected failure and turn it into an opaque internal error.
fn internal(op: &'static str, cause: impl Display) -> AuthError {
    error!(error = %cause, "{op} failed");
    AuthError::internal(op, cause)
}

/// Detail of an error from a lower layer, for re-wrapping under another op.
fn reason(e: AuthError) -> String {
    match e {
        AuthError::Internal { op, reason } => format!("{op}: {reason}"),
        other => other.to_string(),
    }
}
