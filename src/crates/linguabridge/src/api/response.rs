//! API response helpers
//!
//! Consistent JSON envelopes: `{success, data}` for single results and a
//! paginated wrapper for lists.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Generic success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    /// Create a new success response
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Create a 200 OK JSON response
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(SuccessResponse::new(data)))
}

/// Create a 201 Created JSON response
pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(SuccessResponse::new(data)))
}

/// Create a 204 No Content response
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Response data items
    pub data: Vec<T>,
    /// Current page number (0-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
    /// Total number of items
    pub total: u32,
    /// Total number of pages
    pub pages: u32,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u32) -> Self {
        let pages = total.div_ceil(per_page.max(1));
        Self {
            data,
            page,
            per_page,
            total,
            pages,
        }
    }
}

/// Slice one page out of a full result set
pub fn paginate<T: Serialize>(items: Vec<T>, page: u32, per_page: u32) -> PaginatedResponse<T> {
    let total = items.len() as u32;
    let offset = (page as usize) * (per_page as usize);
    let data: Vec<T> = items
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();
    PaginatedResponse::new(data, page, per_page, total)
}

/// Create a paginated response
pub fn paginated<T: Serialize>(items: Vec<T>, page: u32, per_page: u32) -> impl IntoResponse {
    (StatusCode::OK, Json(paginate(items, page, per_page)))
}
