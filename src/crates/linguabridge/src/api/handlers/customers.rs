//! Customer and contact endpoint handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::validation::validate_pagination,
    models::{
        CreateContactRequest, CreateCustomerRequest, PageQuery, UpdateCustomerRequest,
        MAX_PER_PAGE,
    },
    response,
    routes::AppState,
};
use crate::db::error::is_unique_violation;
use crate::db::models::{Contact, Customer};
use crate::db::repositories::CustomerRepository;
use crate::db::DatabasePool;

fn email_conflict(email: &str) -> impl FnOnce(sqlx::Error) -> ApiError + '_ {
    move |e| {
        if is_unique_violation(&e) {
            ApiError::Conflict(format!("a customer with email {} already exists", email))
        } else {
            e.into()
        }
    }
}

async fn load_customer(pool: &DatabasePool, id: &str) -> ApiResult<Customer> {
    CustomerRepository::get_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer {} not found", id)))
}

/// Create a customer
///
/// POST /api/v1/customers
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let customer = req.into_customer(Uuid::new_v4().to_string());
    let created = CustomerRepository::create(app_state.db.pool(), &customer)
        .await
        .map_err(email_conflict(&customer.email))?;

    tracing::info!("Created customer: {}", created.id);
    Ok(response::created(created))
}

/// List customers
///
/// GET /api/v1/customers
pub async fn list_customers(
    State(app_state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_pagination(query.page(), query.per_page(), MAX_PER_PAGE)?;

    let customers = CustomerRepository::list(app_state.db.pool()).await?;
    Ok(response::paginated(customers, query.page(), query.per_page()))
}

/// Get a customer
///
/// GET /api/v1/customers/:id
pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let customer = load_customer(app_state.db.pool(), &id).await?;
    Ok(response::ok(customer))
}

/// Update a customer
///
/// PUT /api/v1/customers/:id
pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCustomerRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let pool = app_state.db.pool();
    let mut customer = load_customer(pool, &id).await?;
    req.apply_to(&mut customer);

    CustomerRepository::update(pool, &customer)
        .await
        .map_err(email_conflict(&customer.email))?;

    tracing::info!("Updated customer: {}", id);
    Ok(response::ok(customer))
}

/// Delete a customer
///
/// DELETE /api/v1/customers/:id
///
/// Customers referenced by quotes cannot be removed (409).
pub async fn delete_customer(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let deleted = CustomerRepository::delete(app_state.db.pool(), &id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Customer {} not found", id)));
    }

    tracing::info!("Deleted customer: {}", id);
    Ok(response::no_content())
}

/// List a customer's contacts
///
/// GET /api/v1/customers/:id/contacts
pub async fn list_contacts(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    load_customer(pool, &id).await?;
    let contacts = CustomerRepository::list_contacts(pool, &id).await?;
    Ok(response::ok(contacts))
}

/// Add a contact person
///
/// POST /api/v1/customers/:id/contacts
pub async fn create_contact(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateContactRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let pool = app_state.db.pool();
    load_customer(pool, &id).await?;

    let contact = Contact {
        id: Uuid::new_v4().to_string(),
        customer_id: id,
        name: req.name.trim().to_string(),
        email: req.email,
        phone: req.phone,
        role: req.role,
        created_at: crate::db::now_timestamp(),
    };
    let created = CustomerRepository::create_contact(pool, &contact).await?;

    tracing::info!("Added contact {} to customer {}", created.id, created.customer_id);
    Ok(response::created(created))
}
