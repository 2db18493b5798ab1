//! End-to-end tests for the session and account routes over the in-memory
//! repository.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use civichub_api::{AppState, build_app};
use civichub_auth::NewCredential;
use civichub_core::config::AppConfig;
use civichub_core::error::ErrorKind;
use civichub_database::MemoryAccountRepository;
use civichub_entity::account::AccountRole;

const ADMIN_EMAIL: &str = "admin@civichub.org";
const ADMIN_PASSWORD: &str = "correct-horse";

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = Some("integration-secret".into());
    config
}

async fn app() -> (Router, AppState) {
    let state = AppState::new(config(), Arc::new(MemoryAccountRepository::new())).unwrap();
    state
        .credentials()
        .create(NewCredential {
            email: ADMIN_EMAIL.into(),
            username: "admin".into(),
            secret: ADMIN_PASSWORD.into(),
            role: Some(AccountRole::Admin),
        })
        .await
        .unwrap();
    (build_app(state.clone()), state)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value, Option<String>) {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/login",
            None,
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    (status, body_json(response).await, cookie)
}

#[tokio::test]
async fn test_login_sets_cookie_and_returns_token() {
    let (app, _) = app().await;
    let (status, body, cookie) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let cookie = cookie.unwrap();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
}

#[tokio::test]
async fn test_token_passes_guard_via_header_and_cookie() {
    let (app, _) = app().await;
    let (_, body, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let token = body["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/verify", Some(token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let verified = body_json(response).await;
    assert_eq!(verified["user"]["email"], ADMIN_EMAIL);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/verify")
                .header(header::COOKIE, format!("jwt={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_is_401() {
    let (app, _) = app().await;
    let (status, body, cookie) = login(&app, ADMIN_EMAIL, "wrong-horse").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Invalid credentials");
    assert!(cookie.is_none());
}

#[tokio::test]
async fn test_missing_fields_is_400() {
    let (app, _) = app().await;
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/login",
            None,
            json!({ "email": ADMIN_EMAIL }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_guard_rejects_missing_and_invalid_tokens() {
    let (app, _) = app().await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/verify", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "No token provided");

    let response = app
        .oneshot(empty_request(Method::GET, "/api/verify", Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_logout_removes_cookie() {
    let (app, _) = app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/logout")
                .header(header::COOKIE, "jwt=stale")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("Max-Age=0"));
    assert_eq!(body_json(response).await["message"], "Logged out");
}

#[tokio::test]
async fn test_duplicate_email_is_409_and_keeps_one_account() {
    let (app, state) = app().await;
    let (_, body, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let token = body["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/admins",
            Some(token),
            json!({ "email": ADMIN_EMAIL, "username": "other", "password": "long-enough" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(state.credentials().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_admin_crud_round() {
    let (app, _) = app().await;
    let (_, body, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let token = body["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/admins",
            Some(token),
            json!({ "email": "editor@civichub.org", "username": "editor", "password": "long-enough" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["message"], "Admin created");
    assert_eq!(created["admin"]["role"], "admin");
    let id = created["admin"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/admins/{id}"),
            Some(token),
            json!({ "username": "chief-editor" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["admin"]["username"], "chief-editor");

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/admins", Some(token)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["admins"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::DELETE,
            &format!("/api/admins/{id}"),
            Some(token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request(
            Method::GET,
            &format!("/api/admins/{id}"),
            Some(token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let (app, state) = app().await;
    state
        .credentials()
        .create(NewCredential {
            email: "member@civichub.org".into(),
            username: "member".into(),
            secret: "member-pass".into(),
            role: Some(AccountRole::User),
        })
        .await
        .unwrap();
    let (_, body, _) = login(&app, "member@civichub.org", "member-pass").await;
    let token = body["token"].as_str().unwrap();

    let response = app
        .oneshot(empty_request(Method::GET, "/api/admins", Some(token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_id_is_400() {
    let (app, _) = app().await;
    let (_, body, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let token = body["token"].as_str().unwrap();
    let response = app
        .oneshot(empty_request(Method::GET, "/api/admins/not-a-uuid", Some(token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_has_security_headers() {
    let (app, _) = app().await;
    let response = app
        .oneshot(empty_request(Method::GET, "/api/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "no-referrer");
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_state_requires_signing_secret() {
    let err = AppState::new(
        AppConfig::default(),
        Arc::new(MemoryAccountRepository::new()),
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}
