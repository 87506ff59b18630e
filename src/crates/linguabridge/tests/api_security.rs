//! API-key protection of admin routes

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use linguabridge::config::{SecurityConfig, SecurityMode, ServerConfig};

const ADMIN_KEY: &str = "admin-integration-key";

fn secured_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.security = SecurityConfig {
        mode: SecurityMode::SecretKey,
        secret_key: Some(ADMIN_KEY.to_string()),
    };
    config
}

#[tokio::test]
async fn test_admin_routes_require_bearer_key() {
    if std::env::var("SECRET_KEY").is_ok() {
        return;
    }
    let app = TestApp::with_config(secured_config()).await;

    let (status, body) = app.get("/api/v1/customers").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app
        .post("/api/v1/languages", json!({ "code": "it", "name": "Italian" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let app = app.with_bearer("wrong-key");
    let (status, _) = app.get("/api/v1/customers").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let app = app.with_bearer(ADMIN_KEY);
    let (status, body) = app.get("/api/v1/customers").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_public_routes_stay_open() {
    if std::env::var("SECRET_KEY").is_ok() {
        return;
    }
    let app = TestApp::with_config(secured_config()).await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, _) = app.get("/api/v1/system/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.post_empty("/api/v1/invitations/unknown-token/decline").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_open_mode_needs_no_key() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/languages").await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["code"].as_str().unwrap().to_string())
        .collect();
    assert!(codes.contains(&"ht".to_string()));

    let (status, body) = app.get("/api/v1/system/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["open_quotes"], 0);
}
