//! Web API Authentication Tests
//!
//! Integration tests for account registration, login, session refresh,
//! and logout.

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use materials_hub::web::handlers::AppState;
use materials_hub::web::middleware::JwtState;
use materials_hub::web::router::create_router;
use materials_hub::{Database, ObjectStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Create a test server with an in-memory database and a temp object store.
async fn create_test_server() -> (TestServer, Arc<Database>, TempDir) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let shared_db = Arc::new(db);

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Arc::new(
        ObjectStore::new(temp_dir.path(), "http://localhost:8080/files")
            .expect("Failed to create object store"),
    );

    let app_state = Arc::new(AppState::new(
        shared_db.clone(),
        store,
        TEST_JWT_SECRET,
        900,
        7,
        50 * 1024 * 1024,
    ));

    let jwt_state = Arc::new(JwtState::new(TEST_JWT_SECRET));

    let router = create_router(app_state, jwt_state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, shared_db, temp_dir)
}

/// Helper to register a test user and return the session response.
async fn register_test_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let (server, _db, _store_dir) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "coach@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["access_token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());
    assert_eq!(body["data"]["expires_in"], 900);
    assert_eq!(body["data"]["user"]["email"], "coach@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (server, _db, _store_dir) = create_test_server().await;

    server
        .post("/api/auth/register")
        .json(&json!({
            "email": "coach@example.com",
            "password": "password123"
        }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "coach@example.com",
            "password": "password456"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_duplicate_email_different_case() {
    let (server, _db, _store_dir) = create_test_server().await;

    register_test_user(&server, "coach@example.com", "password123").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "Coach@Example.com",
            "password": "password456"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let (server, _db, _store_dir) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "not-an-email",
            "password": "password123"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_short_password() {
    let (server, _db, _store_dir) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "coach@example.com",
            "password": "short"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let (server, _db, _store_dir) = create_test_server().await;

    register_test_user(&server, "coach@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "coach@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["access_token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());
    assert_eq!(body["data"]["user"]["email"], "coach@example.com");
}

#[tokio::test]
async fn test_login_case_insensitive_email() {
    let (server, _db, _store_dir) = create_test_server().await;

    register_test_user(&server, "coach@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "COACH@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (server, _db, _store_dir) = create_test_server().await;

    register_test_user(&server, "coach@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "coach@example.com",
            "password": "wrongpassword"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_nonexistent_user() {
    let (server, _db, _store_dir) = create_test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    // Unknown email and wrong password produce the same message
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_empty_credentials() {
    let (server, _db, _store_dir) = create_test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "",
            "password": ""
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Token Refresh Tests
// ============================================================================

#[tokio::test]
async fn test_refresh_token_success() {
    let (server, _db, _store_dir) = create_test_server().await;

    let login_response = register_test_user(&server, "coach@example.com", "password123").await;
    let refresh_token = login_response["data"]["refresh_token"]
        .as_str()
        .expect("No refresh token");

    let response = server
        .post("/api/auth/refresh")
        .json(&json!({
            "refresh_token": refresh_token
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["access_token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());
    // Rotation: the new refresh token differs from the presented one
    assert_ne!(
        body["data"]["refresh_token"].as_str().unwrap(),
        refresh_token
    );
}

#[tokio::test]
async fn test_refresh_token_invalid() {
    let (server, _db, _store_dir) = create_test_server().await;

    let response = server
        .post("/api/auth/refresh")
        .json(&json!({
            "refresh_token": "invalid-token"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_already_used() {
    let (server, _db, _store_dir) = create_test_server().await;

    let login_response = register_test_user(&server, "coach@example.com", "password123").await;
    let refresh_token = login_response["data"]["refresh_token"]
        .as_str()
        .expect("No refresh token");

    let response = server
        .post("/api/auth/refresh")
        .json(&json!({
            "refresh_token": refresh_token
        }))
        .await;
    response.assert_status_ok();

    // The presented token was revoked during rotation
    let response = server
        .post("/api/auth/refresh")
        .json(&json!({
            "refresh_token": refresh_token
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Logout Tests
// ============================================================================

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let (server, _db, _store_dir) = create_test_server().await;

    let login_response = register_test_user(&server, "coach@example.com", "password123").await;
    let refresh_token = login_response["data"]["refresh_token"]
        .as_str()
        .expect("No refresh token");

    let response = server
        .post("/api/auth/logout")
        .json(&json!({
            "refresh_token": refresh_token
        }))
        .await;

    response.assert_status_ok();

    let response = server
        .post("/api/auth/refresh")
        .json(&json!({
            "refresh_token": refresh_token
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_unknown_token_is_ok() {
    let (server, _db, _store_dir) = create_test_server().await;

    // Logout is idempotent; an unknown token is not an error
    let response = server
        .post("/api/auth/logout")
        .json(&json!({
            "refresh_token": "never-issued"
        }))
        .await;

    response.assert_status_ok();
}

// ============================================================================
// Me (Current User) Tests
// ============================================================================

#[tokio::test]
async fn test_me_success() {
    let (server, _db, _store_dir) = create_test_server().await;

    let login_response = register_test_user(&server, "coach@example.com", "password123").await;
    let access_token = login_response["data"]["access_token"]
        .as_str()
        .expect("No access token");

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {}", access_token))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "coach@example.com");
    assert!(body["data"]["created_at"].is_string());
}

#[tokio::test]
async fn test_me_unauthorized() {
    let (server, _db, _store_dir) = create_test_server().await;

    let response = server.get("/api/auth/me").await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_invalid_token() {
    let (server, _db, _store_dir) = create_test_server().await;

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, "Bearer invalid-token")
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Token Claims Tests
// ============================================================================

#[tokio::test]
async fn test_access_token_contains_expected_claims() {
    let (server, _db, _store_dir) = create_test_server().await;

    let login_response = register_test_user(&server, "coach@example.com", "password123").await;
    let access_token = login_response["data"]["access_token"]
        .as_str()
        .expect("No access token");

    let parts: Vec<&str> = access_token.split('.').collect();
    assert_eq!(parts.len(), 3, "JWT should have 3 parts");

    use base64::Engine;
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let payload = engine
        .decode(parts[1])
        .expect("Failed to decode JWT payload");
    let claims: Value = serde_json::from_slice(&payload).expect("Failed to parse claims");

    assert_eq!(claims["email"], "coach@example.com");
    assert!(claims["sub"].is_number());
    assert!(claims["iat"].is_number());
    assert!(claims["exp"].is_number());
    assert!(claims["jti"].is_string());
}
