//! Common test utilities and setup

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use linguabridge::api::{create_router, AppState};
use linguabridge::config::ServerConfig;
use linguabridge::db::DatabaseConnection;
use linguabridge::services::geo::miles_to_latitude_degrees;

/// Job site used by the matching scenarios
pub const JOB_SITE: (f64, f64) = (26.0, -80.2);

/// Router over a fresh in-memory database
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    bearer: Option<String>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let db = DatabaseConnection::in_memory()
            .await
            .expect("Failed to create test database");
        let router = create_router(AppState::new(db.clone(), config));
        Self {
            router,
            db,
            bearer: None,
        }
    }

    /// Send `Authorization: Bearer <key>` on every following request
    pub fn with_bearer(mut self, key: &str) -> Self {
        self.bearer = Some(key.to_string());
        self
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed to respond");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response is not JSON")
        };
        (status, body)
    }

    fn builder(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = &self.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }
        builder
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = self.builder(Method::GET, uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = self
            .builder(Method::POST, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        let request = self.builder(Method::POST, uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = self.builder(Method::DELETE, uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Create a customer and return its id
    pub async fn create_customer(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .post("/api/v1/customers", json!({ "name": name, "email": email, "state": "FL" }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Create an on-site en/es interpreter `miles_north` of the job site
    pub async fn create_interpreter(&self, last_name: &str, miles_north: f64, max_travel: f64) -> String {
        let (status, body) = self
            .post(
                "/api/v1/linguists",
                json!({
                    "first_name": "Test",
                    "last_name": last_name,
                    "email": format!("{}@linguists.test", last_name.to_lowercase()),
                    "latitude": JOB_SITE.0 + miles_to_latitude_degrees(miles_north),
                    "longitude": JOB_SITE.1,
                    "max_travel_distance": max_travel,
                    "available_onsite": true,
                    "languages": [
                        { "language_code": "en", "service": "interpretation" },
                        { "language_code": "es", "service": "interpretation" }
                    ]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Create an on-site quote at the job site, returning (id, total)
    pub async fn create_onsite_quote(&self, customer_id: &str) -> (String, f64) {
        let (status, body) = self
            .post(
                "/api/v1/quotes",
                json!({
                    "customer_id": customer_id,
                    "source_language": "en",
                    "target_language": "es",
                    "service_type": "onsite",
                    "word_count": 3,
                    "rate": 65.0,
                    "minimum_charge": 130.0,
                    "address": "201 SE 6th St, Fort Lauderdale, FL",
                    "latitude": JOB_SITE.0,
                    "longitude": JOB_SITE.1,
                    "scheduled_at": "2026-11-02T14:00:00Z"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let quote = &body["data"];
        (
            quote["id"].as_str().unwrap().to_string(),
            quote["total"].as_f64().unwrap(),
        )
    }

    pub async fn set_quote_status(&self, quote_id: &str, status: &str) -> (StatusCode, Value) {
        self.post(
            &format!("/api/v1/quotes/{}/status", quote_id),
            json!({ "status": status }),
        )
        .await
    }

    /// Walk a quote to INVOICE_PAID and return the project id
    pub async fn paid_project(&self, quote_id: &str) -> String {
        for next in ["SENT", "ACCEPTED", "INVOICED"] {
            let (status, body) = self.set_quote_status(quote_id, next).await;
            assert_eq!(status, StatusCode::OK, "{} -> {}", next, body);
        }
        let (status, body) = self.set_quote_status(quote_id, "INVOICE_PAID").await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["project"]["id"].as_str().unwrap().to_string()
    }
}
