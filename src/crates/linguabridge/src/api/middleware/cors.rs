//! CORS middleware configuration

use tower_http::cors::CorsLayer;

/// CORS layer for the admin API and the linguist portal links
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
