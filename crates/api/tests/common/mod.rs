//! Shared helpers for HTTP-level integration tests.
//!
//! Tests run against the in-memory storage backend through the exact same
//! router and middleware stack production uses, so no database is needed.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use leaseflow_api::auth::jwt::{generate_access_token, JwtConfig};
use leaseflow_api::auth::password::hash_password;
use leaseflow_api::config::ServerConfig;
use leaseflow_api::router::build_app_router;
use leaseflow_api::state::AppState;
use leaseflow_core::types::DbId;
use leaseflow_db::models::user::{CreateUser, User};
use leaseflow_db::store::{MemStorage, UserStore};
use tower::ServiceExt;

/// The plaintext password every seeded test user gets.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with a fixed JWT secret and safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-key".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the application router over a fresh in-memory store.
///
/// Returns the router plus the storage handle so tests can seed data
/// directly.
pub fn build_test_app() -> (Router, Arc<MemStorage>) {
    let storage = Arc::new(MemStorage::new());
    let config = test_config();
    let state = AppState {
        storage: storage.clone(),
        config: Arc::new(config.clone()),
        pool: None,
    };
    (build_app_router(state, &config), storage)
}

/// Seed a user directly in storage and return the row.
pub async fn seed_user(storage: &MemStorage, username: &str, role: &str) -> User {
    seed_company_user(storage, username, role, None).await
}

/// Seed a user attached to a leasing company (for managers).
pub async fn seed_company_user(
    storage: &MemStorage,
    username: &str,
    role: &str,
    company_id: Option<DbId>,
) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    storage
        .create_user(CreateUser {
            username: username.to_string(),
            password_hash,
            email: Some(format!("{username}@test.com")),
            first_name: None,
            last_name: None,
            role: role.to_string(),
            phone: None,
            tax_id: None,
            company_id,
        })
        .await
        .expect("user creation should succeed")
}

/// Mint an access token for a seeded user, bypassing the login endpoint.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request should not fail")
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request should not fail")
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request should not fail")
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request_json_auth(app, "POST", uri, token, body).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request_json_auth(app, "PATCH", uri, token, body).await
}

async fn request_json_auth(
    app: Router,
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request should not fail")
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert a response status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
