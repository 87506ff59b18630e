//! API route definitions
//!
//! Admin routes sit behind the API-key layer; health checks, invitation
//! tokens and the signed payment webhook are public.

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::{handlers, middleware::cors_layer, middleware::logging_layer};
use crate::config::{security_middleware, SecurityState, ServerConfig};
use crate::db::DatabaseConnection;
use crate::services::{Mailer, OutboxMailer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<ServerConfig>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// State with the database outbox as mailer
    pub fn new(db: DatabaseConnection, config: ServerConfig) -> Self {
        let mailer = Arc::new(OutboxMailer::new(db.pool().clone()));
        Self {
            db,
            config: Arc::new(config),
            mailer,
        }
    }
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        // System endpoints
        .route("/api/v1/system/info", get(handlers::system_info))
        // Language endpoints
        .route(
            "/api/v1/languages",
            get(handlers::list_languages).post(handlers::create_language),
        )
        // Customer endpoints
        .route(
            "/api/v1/customers",
            post(handlers::create_customer).get(handlers::list_customers),
        )
        .route(
            "/api/v1/customers/:id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route(
            "/api/v1/customers/:id/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        // Linguist endpoints
        .route(
            "/api/v1/linguists",
            post(handlers::create_linguist).get(handlers::list_linguists),
        )
        .route(
            "/api/v1/linguists/:id",
            get(handlers::get_linguist)
                .put(handlers::update_linguist)
                .delete(handlers::delete_linguist),
        )
        .route(
            "/api/v1/linguists/:id/languages",
            put(handlers::set_linguist_languages),
        )
        // Pricing endpoints
        .route(
            "/api/v1/pricing-rules",
            post(handlers::create_pricing_rule).get(handlers::list_pricing_rules),
        )
        .route(
            "/api/v1/pricing-rules/:id",
            get(handlers::get_pricing_rule)
                .put(handlers::update_pricing_rule)
                .delete(handlers::delete_pricing_rule),
        )
        .route("/api/v1/pricing/estimate", post(handlers::estimate_price))
        // Coupon endpoints
        .route(
            "/api/v1/coupons",
            post(handlers::create_coupon).get(handlers::list_coupons),
        )
        .route("/api/v1/coupons/validate", post(handlers::validate_coupon))
        .route(
            "/api/v1/coupons/:id",
            get(handlers::get_coupon).delete(handlers::delete_coupon),
        )
        // Quote endpoints
        .route(
            "/api/v1/quotes",
            post(handlers::create_quote).get(handlers::list_quotes),
        )
        .route("/api/v1/quotes/:id", get(handlers::get_quote))
        .route("/api/v1/quotes/:id/status", post(handlers::update_quote_status))
        // Invoice endpoints
        .route("/api/v1/invoices", get(handlers::list_invoices))
        .route("/api/v1/invoices/:id", get(handlers::get_invoice))
        // Project endpoints
        .route("/api/v1/projects", get(handlers::list_projects))
        .route("/api/v1/projects/:id", get(handlers::get_project))
        .route(
            "/api/v1/projects/:id/status",
            post(handlers::update_project_status),
        )
        .route("/api/v1/projects/:id/matches", post(handlers::preview_matches))
        .route(
            "/api/v1/projects/:id/invitations",
            post(handlers::send_project_invitations).get(handlers::list_project_invitations),
        )
        .route(
            "/api/v1/projects/:id/purchase-orders",
            get(handlers::list_purchase_orders),
        )
        // Invitation maintenance
        .route("/api/v1/invitations/expire", post(handlers::expire_invitations))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        // Health check endpoints
        .route("/health", get(handlers::health))
        .route("/api/v1/system/health", get(handlers::health_detailed))
        // Linguist portal links
        .route(
            "/api/v1/invitations/:token/accept",
            post(handlers::accept_invitation),
        )
        .route(
            "/api/v1/invitations/:token/decline",
            post(handlers::decline_invitation),
        )
        // Payment provider
        .route("/api/v1/webhooks/payments", post(handlers::payment_webhook))
}

/// Build the complete API router
pub fn create_router(app_state: AppState) -> Router {
    let security = Arc::new(SecurityState::new(app_state.config.security.clone()));

    let admin = admin_routes().route_layer(middleware::from_fn(move |request: Request, next: Next| {
        security_middleware(security.clone(), request, next)
    }));

    Router::new()
        .merge(public_routes())
        .merge(admin)
        .layer(logging_layer())
        .layer(cors_layer())
        .with_state(app_state)
}
