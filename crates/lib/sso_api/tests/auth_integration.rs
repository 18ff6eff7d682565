//! Integration test: build the router over in-memory storage and drive the
//! auth endpoints end to end.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use sso_api::config::ApiConfig;
use sso_api::error::INVALID_BODY;
use sso_api::{AppState, routes};
use sso_core::auth::jwt::verify_token;
use sso_core::auth::service::Auth;
use sso_core::auth::testing::{FailingStorage, MemoryStorage};
use tower::ServiceExt;

fn app_with(storage: Arc<MemoryStorage>) -> axum::Router {
    let auth = Auth::new(
        tracing::Span::none(),
        storage.clone(),
        storage.clone(),
        storage,
        Duration::from_secs(3600),
    );
    sso_api::router(AppState {
        auth: Arc::new(auth),
        config: ApiConfig::default(),
    })
}

fn app() -> (axum::Router, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new().with_app(42, "demo", "secret-42"));
    (app_with(storage.clone()), storage)
}

async fn call(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call_raw(app, uri, "application/json", body.to_string()).await
}

async fn call_raw(
    app: &axum::Router,
    uri: &str,
    content_type: &str,
    body: String,
) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();

    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn register_login_and_reject_bad_attempts() {
    let (app, _) = app();

    let (status, json) = call(
        &app,
        routes::POST_AUTH_REGISTER,
        json!({"email": "a@x.com", "password": "pw123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["userId"], 1);

    let (status, json) = call(
        &app,
        routes::POST_AUTH_LOGIN,
        json!({"email": "a@x.com", "password": "pw123", "appId": 42}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = json["token"].as_str().expect("token is string");
    let claims = verify_token(token, b"secret-42").expect("token verifies");
    assert_eq!(claims.uid, 1);
    assert_eq!(claims.app_id, 42);

    let (wrong_status, wrong_json) = call(
        &app,
        routes::POST_AUTH_LOGIN,
        json!({"email": "a@x.com", "password": "wrong", "appId": 42}),
    )
    .await;
    let (missing_status, missing_json) = call(
        &app,
        routes::POST_AUTH_LOGIN,
        json!({"email": "missing@x.com", "password": "pw123", "appId": 42}),
    )
    .await;
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, missing_status);
    assert_eq!(wrong_json, missing_json);
    assert_eq!(wrong_json["error"], "invalid_credentials");

    let (status, json) = call(
        &app,
        routes::POST_AUTH_LOGIN,
        json!({"email": "a@x.com", "password": "pw123", "appId": 999}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_app_id");
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let (app, storage) = app();
    let body = json!({"email": "a@x.com", "password": "pw123"});

    let (status, _) = call(&app, routes::POST_AUTH_REGISTER, body.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = call(&app, routes::POST_AUTH_REGISTER, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "user_exists");
    assert_eq!(storage.user_count(), 1);
}

#[tokio::test]
async fn missing_fields_are_rejected_before_the_service() {
    let (app, storage) = app();

    let cases = [
        (
            routes::POST_AUTH_LOGIN,
            json!({"password": "pw", "appId": 42}),
            "email is required",
        ),
        (
            routes::POST_AUTH_LOGIN,
            json!({"email": "a@x.com", "appId": 42}),
            "password is required",
        ),
        (
            routes::POST_AUTH_LOGIN,
            json!({"email": "a@x.com", "password": "pw"}),
            "appId is required",
        ),
        (
            routes::POST_AUTH_REGISTER,
            json!({"email": "", "password": "pw"}),
            "email is required",
        ),
        (routes::POST_AUTH_IS_ADMIN, json!({}), "userId is required"),
    ];

    for (uri, body, message) in cases {
        let (status, json) = call(&app, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {message}");
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], message);
    }
    assert_eq!(storage.user_count(), 0);
}

#[tokio::test]
async fn undecodable_bodies_get_the_error_envelope() {
    let (app, storage) = app();

    let cases = [
        (
            routes::POST_AUTH_LOGIN,
            "application/json",
            r#"{"email":"a@x.com","password":"pw","appId":"42"}"#,
        ),
        (routes::POST_AUTH_LOGIN, "application/json", "{not json"),
        (
            routes::POST_AUTH_REGISTER,
            "text/plain",
            r#"{"email":"a@x.com","password":"pw"}"#,
        ),
        (routes::POST_AUTH_IS_ADMIN, "application/json", r#"{"userId":true}"#),
    ];

    for (uri, content_type, body) in cases {
        let (status, json) = call_raw(&app, uri, content_type, body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {content_type} {body}");
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], INVALID_BODY);
    }
    assert_eq!(storage.user_count(), 0);
}

#[tokio::test]
async fn is_admin_reports_flag_and_unknown_user() {
    let (app, storage) = app();

    for email in ["user@x.com", "admin@x.com"] {
        call(
            &app,
            routes::POST_AUTH_REGISTER,
            json!({"email": email, "password": "pw"}),
        )
        .await;
    }
    assert!(storage.grant_admin(2));

    let (status, json) = call(&app, routes::POST_AUTH_IS_ADMIN, json!({"userId": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isAdmin"], false);

    let (_, json) = call(&app, routes::POST_AUTH_IS_ADMIN, json!({"userId": 2})).await;
    assert_eq!(json["isAdmin"], true);

    let (status, json) = call(&app, routes::POST_AUTH_IS_ADMIN, json!({"userId": 99})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "user_not_found");
}

#[tokio::test]
async fn storage_outage_is_opaque_server_error() {
    let failing = Arc::new(FailingStorage);
    let auth = Auth::new(
        tracing::Span::none(),
        failing.clone(),
        failing.clone(),
        failing,
        Duration::from_secs(60),
    );
    let app = sso_api::router(AppState {
        auth: Arc::new(auth),
        config: ApiConfig::default(),
    });

    let (status, json) = call(
        &app,
        routes::POST_AUTH_REGISTER,
        json!({"email": "a@x.com", "password": "pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal");
    assert_eq!(json["message"], "Internal server error");
}

#[tokio::test]
async fn health_reports_version_and_profile() {
    let (app, _) = app();
    let req = Request::builder()
        .uri(routes::GET_HEALTH)
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json: Value = serde_json::from_slice(&bytes).expect("parse JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], sso_core::version());
    assert_eq!(json["env"], "local");
}
