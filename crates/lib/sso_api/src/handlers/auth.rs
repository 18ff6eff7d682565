//! Authentication request handlers.
//!
//! Field presence is checked here, before the auth service is called.
//! Password strength is not enforced at either layer.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    IsAdminRequest, IsAdminResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse,
};

/// `POST /auth/login`: authenticate with email + password for an app.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(body) = payload?;
    validate_login(&body)?;
    let token = state
        .auth
        .login(&body.email, &body.password, body.app_id)
        .await?;
    Ok(Json(LoginResponse { token }))
}

/// `POST /auth/register`: create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Json<RegisterResponse>> {
    let Json(body) = payload?;
    validate_register(&body)?;
    let user_id = state
        .auth
        .register_new_user(&body.email, &body.password)
        .await?;
    Ok(Json(RegisterResponse { user_id }))
}

/// `POST /auth/is_admin`: check whether a user has the admin flag.
pub async fn is_admin_handler(
    State(state): State<AppState>,
    payload: Result<Json<IsAdminRequest>, JsonRejection>,
) -> AppResult<Json<IsAdminResponse>> {
    let Json(body) = payload?;
    validate_is_admin(&body)?;
    let is_admin = state.auth.is_admin(body.user_id).await?;
    Ok(Json(IsAdminResponse { is_admin }))
}

fn validate_login(req: &LoginRequest) -> AppResult<()> {
    require_credentials(&req.email, &req.password)?;
    if req.app_id == 0 {
        return Err(AppError::Validation("appId is required".into()));
    }
    Ok(())
}

fn validate_register(req: &RegisterRequest) -> AppResult<()> {
    require_credentials(&req.email, &req.password)
}

fn validate_is_admin(req: &IsAdminRequest) -> AppResult<()> {
    if req.user_id == 0 {
        return Err(AppError::Validation("userId is required".into()));
    }
    Ok(())
}

fn require_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("password is required".into()));
    }
    Ok(())
}
