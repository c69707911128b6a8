//! HTTP contract tests for the /api/user endpoints

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use roster::db::{Repository, UserRepository};
use roster::{ApiServer, Config, DatabaseManager};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

const CREATE_USER_URL: &str = "/api/user/create/";
const TOKEN_URL: &str = "/api/user/token/";
const ME_URL: &str = "/api/user/me/";

fn app() -> Router {
    app_with_db().0
}

fn app_with_db() -> (Router, Arc<DatabaseManager>) {
    let mut config = Config::defaults().unwrap();
    config.security.bcrypt_cost = 4;
    let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
    let router = ApiServer::new(&config, db.clone()).unwrap().router().clone();
    (router, db)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_user(app: &Router, email: &str, password: &str, name: &str) {
    let (status, _) = send(
        app,
        Method::POST,
        CREATE_USER_URL,
        None,
        Some(json!({"email": email, "password": password, "name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn token_for(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        TOKEN_URL,
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_valid_user_success() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        CREATE_USER_URL,
        None,
        Some(json!({"email": "test@example.com", "password": "testpass", "name": "Test name"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"email": "test@example.com", "name": "Test name"}));
    assert!(body.get("password").is_none());

    // the stored password verifies through the token endpoint
    token_for(&app, "test@example.com", "testpass").await;
}

#[tokio::test]
async fn test_user_exists() {
    let app = app();
    create_user(&app, "test@example.com", "testpass", "Test").await;

    let (status, body) = send(
        &app,
        Method::POST,
        CREATE_USER_URL,
        None,
        Some(json!({"email": "test@example.com", "password": "testpass", "name": "Test"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn test_password_too_short() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        CREATE_USER_URL,
        None,
        Some(json!({"email": "test@example.com", "password": "pw", "name": "Test"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // nothing was stored, so the address is still free
    create_user(&app, "test@example.com", "testpass", "Test").await;
}

#[tokio::test]
async fn test_create_user_rejects_bad_input() {
    let app = app();

    for body in [
        json!({"email": "not-an-email", "password": "testpass"}),
        json!({"password": "testpass"}),
        json!({"email": "test@example.com"}),
        json!({"email": "test@example.com", "password": "testpass", "name": "x".repeat(256)}),
    ] {
        let (status, _) = send(&app, Method::POST, CREATE_USER_URL, None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(CREATE_USER_URL)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_token_for_user() {
    let app = app();
    create_user(&app, "test@example.com", "test-user-password123", "Test Name").await;

    let (status, body) = send(
        &app,
        Method::POST,
        TOKEN_URL,
        None,
        Some(json!({"email": "test@example.com", "password": "test-user-password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    // the same token is handed out on the next login
    let again = token_for(&app, "test@example.com", "test-user-password123").await;
    assert_eq!(body["token"].as_str().unwrap(), again);
}

#[tokio::test]
async fn test_create_token_bad_credentials() {
    let app = app();
    create_user(&app, "test@example.com", "goodpass", "Test").await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        TOKEN_URL,
        None,
        Some(json!({"email": "test@example.com", "password": "badpass"})),
    )
    .await;
    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert!(wrong_body.get("token").is_none());

    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        TOKEN_URL,
        None,
        Some(json!({"email": "nobody@example.com", "password": "goodpass"})),
    )
    .await;
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_body["message"], unknown_body["message"]);
}

#[tokio::test]
async fn test_create_token_blank_password() {
    let app = app();
    create_user(&app, "test@example.com", "goodpass", "Test").await;

    let (status, body) = send(
        &app,
        Method::POST,
        TOKEN_URL,
        None,
        Some(json!({"email": "test@example.com", "password": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_retrieve_user_unauthorized() {
    let app = app();
    let (status, body) = send(&app, Method::GET, ME_URL, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AuthenticationError");

    let (status, _) = send(&app, Method::GET, ME_URL, Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_body_echoes_upstream_trace_id() {
    let request = Request::builder()
        .uri(ME_URL)
        .header("X-Trace-Id", "upstream-123")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("X-Trace-Id").unwrap(), "upstream-123");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["trace_id"], "upstream-123");
}

#[tokio::test]
async fn test_deactivated_user_token_rejected() {
    let (app, db) = app_with_db();
    create_user(&app, "test@example.com", "testpass123", "Test Name").await;
    let token = token_for(&app, "test@example.com", "testpass123").await;

    let users = UserRepository::new(db);
    let mut user = users.find_by_email("test@example.com").await.unwrap().unwrap();
    user.is_active = false;
    users.update(&user).await.unwrap();

    let (status, body) = send(&app, Method::GET, ME_URL, Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AuthenticationError");
}

#[tokio::test]
async fn test_password_longer_than_bcrypt_input_rejected() {
    let app = app();
    let limit = "a".repeat(72);

    let (status, _) = send(
        &app,
        Method::POST,
        CREATE_USER_URL,
        None,
        Some(json!({"email": "long@example.com", "password": format!("{}X", limit)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    create_user(&app, "test@example.com", &limit, "Test Name").await;
    let (status, body) = send(
        &app,
        Method::POST,
        TOKEN_URL,
        None,
        Some(json!({"email": "test@example.com", "password": format!("{}Y", limit)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_retrieve_profile_success() {
    let app = app();
    create_user(&app, "test@example.com", "testpass123", "Test Name").await;
    let token = token_for(&app, "test@example.com", "testpass123").await;

    let (status, body) = send(&app, Method::GET, ME_URL, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "Test Name", "email": "test@example.com"}));

    // trailing slash is optional
    let (status, _) = send(&app, Method::GET, "/api/user/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_post_me_not_allowed() {
    let app = app();
    create_user(&app, "test@example.com", "testpass123", "Test Name").await;
    let token = token_for(&app, "test@example.com", "testpass123").await;

    for token in [Some(token.as_str()), None] {
        let response = app
            .clone()
            .oneshot({
                let mut builder = Request::builder().method(Method::POST).uri(ME_URL);
                if let Some(token) = token {
                    builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
                }
                builder.body(Body::empty()).unwrap()
            })
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
    }
}

#[tokio::test]
async fn test_update_user_profile() {
    let app = app();
    create_user(&app, "test@example.com", "testpass123", "Test Name").await;
    let token = token_for(&app, "test@example.com", "testpass123").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        ME_URL,
        Some(&token),
        Some(json!({"name": "updated name", "password": "newpassword123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "updated name", "email": "test@example.com"}));

    let (status, body) = send(&app, Method::GET, ME_URL, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "updated name");

    // the old password no longer works; the new one does
    let (status, _) = send(
        &app,
        Method::POST,
        TOKEN_URL,
        None,
        Some(json!({"email": "test@example.com", "password": "testpass123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    token_for(&app, "test@example.com", "newpassword123").await;
}

#[tokio::test]
async fn test_update_profile_validates_fields() {
    let app = app();
    create_user(&app, "one@example.com", "testpass123", "One").await;
    create_user(&app, "two@example.com", "testpass123", "Two").await;
    let token = token_for(&app, "one@example.com", "testpass123").await;

    for body in [
        json!({"email": "two@example.com"}),
        json!({"email": "broken"}),
        json!({"password": "pw"}),
    ] {
        let (status, _) = send(&app, Method::PATCH, ME_URL, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = send(
        &app,
        Method::PATCH,
        ME_URL,
        None,
        Some(json!({"name": "anonymous"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
