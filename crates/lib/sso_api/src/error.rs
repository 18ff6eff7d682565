//! Application error types.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sso_core::auth::{AuthError, ErrorKind};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid app: {0}")]
    InvalidApp(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Unauthorized(m) => (
                StatusCode::UNAUTHORIZED,
                ErrorKind::InvalidCredentials.code(),
                m.as_str(),
            ),
            AppError::InvalidApp(m) => {
                (StatusCode::BAD_REQUEST, ErrorKind::InvalidAppId.code(), m.as_str())
            }
            AppError::Conflict(m) => (StatusCode::CONFLICT, ErrorKind::UserExists.code(), m.as_str()),
            AppError::NotFound(m) => {
                (StatusCode::NOT_FOUND, ErrorKind::UserNotFound.code(), m.as_str())
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorKind::Internal.code(),
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthorized(e.to_string()),
            AuthError::InvalidAppId => AppError::InvalidApp(e.to_string()),
            AuthError::UserExists => AppError::Conflict(e.to_string()),
            AuthError::UserNotFound => AppError::NotFound(e.to_string()),
            AuthError::Internal { op, reason } => AppError::Internal(format!("{op}: {reason}")),
        }
    }
}

/// A body that is not JSON, or does not fit the request type, is a
/// validation error. The serde detail is not echoed to the client.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        AppError::Validation(INVALID_BODY.into())
    }
}

/// Message sent when the request body cannot be decoded.
pub const INVALID_BODY: &str = "request body must be a JSON object";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_kinds_map_to_client_or_server_errors() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidAppId, StatusCode::BAD_REQUEST),
            (AuthError::UserExists, StatusCode::CONFLICT),
            (AuthError::UserNotFound, StatusCode::NOT_FOUND),
            (
                AuthError::Internal {
                    op: "auth.login",
                    reason: "pool timed out".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let resp = AppError::from(err).into_response();
            assert_eq!(resp.status(), status);
        }
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("parse JSON")
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let err = AuthError::Internal {
            op: "auth.register_new_user",
            reason: "duplicate key value violates constraint users_pkey".into(),
        };
        let json = body_json(AppError::from(err).into_response()).await;
        assert_eq!(json["error"], "internal");
        assert_eq!(json["message"], "Internal server error");
        assert!(!json.to_string().contains("users_pkey"));
    }

    #[tokio::test]
    async fn domain_errors_carry_kind_code_and_message() {
        let json = body_json(AppError::from(AuthError::InvalidCredentials).into_response()).await;
        assert_eq!(json["error"], ErrorKind::InvalidCredentials.code());
        assert_eq!(json["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn undecodable_body_is_a_validation_error() {
        use axum::extract::FromRequest;
        use axum::http::Request;

        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let rejection = Json::<serde_json::Value>::from_request(req, &())
            .await
            .unwrap_err();

        let resp = AppError::from(rejection).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], INVALID_BODY);
    }
}
