//! # sso_api
//!
//! HTTP API library for the SSO service. Exposes login, registration and
//! admin lookup as JSON remote procedures over the core auth service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sso_core::auth::service::Auth;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health};

/// Route paths.
pub mod routes {
    pub const GET_HEALTH: &str = "/health";
    pub const POST_AUTH_LOGIN: &str = "/auth/login";
    pub const POST_AUTH_REGISTER: &str = "/auth/register";
    pub const POST_AUTH_IS_ADMIN: &str = "/auth/is_admin";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Auth service.
    pub auth: Arc<Auth>,
    /// Configuration the process was started with. `health` reports its profile.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler))
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler))
        .route(routes::POST_AUTH_IS_ADMIN, post(auth::is_admin_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
