//! Project, matching and invitation-dispatch endpoint handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::validation::{parse_field, validate_pagination},
    models::{
        MatchQuery, MatchResponse, ProjectListQuery, ProjectStatusRequest, DEFAULT_PER_PAGE,
        MAX_PER_PAGE,
    },
    response,
    routes::AppState,
};
use crate::db::models::Project;
use crate::db::repositories::{InvitationRepository, ProjectRepository, PurchaseOrderRepository};
use crate::db::DatabasePool;
use crate::domain::ProjectStatus;
use crate::services::{invitations, matching, quotes, MatchRequest};

async fn load_project(pool: &DatabasePool, id: &str) -> ApiResult<Project> {
    ProjectRepository::get_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", id)))
}

/// List projects
///
/// GET /api/v1/projects
pub async fn list_projects(
    State(app_state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let page = query.page.unwrap_or(0);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
    validate_pagination(page, per_page, MAX_PER_PAGE)?;

    let status = query
        .status
        .as_deref()
        .map(|s| parse_field::<ProjectStatus>(s, "status"))
        .transpose()?;

    let projects = ProjectRepository::list(app_state.db.pool(), status.map(|s| s.as_str())).await?;
    Ok(response::paginated(projects, page, per_page))
}

/// Get a project
///
/// GET /api/v1/projects/:id
pub async fn get_project(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let project = load_project(app_state.db.pool(), &id).await?;
    Ok(response::ok(project))
}

/// Move a project through fulfilment
///
/// POST /api/v1/projects/:id/status
pub async fn update_project_status(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProjectStatusRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let next = req.parse()?;
    let project = quotes::transition_project(app_state.db.pool(), &id, next).await?;
    Ok(response::ok(project))
}

/// Preview interpreter candidates for a project
///
/// POST /api/v1/projects/:id/matches?max_distance_miles=
pub async fn preview_matches(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let radius = query.radius(app_state.config.matching.default_max_distance_miles)?;
    let pool = app_state.db.pool();
    let project = load_project(pool, &id).await?;

    let request = MatchRequest::for_project(&project, radius)?;
    let candidates = matching::find_matches(pool, &request).await?;

    tracing::debug!("Project {} has {} candidates within {} miles", id, candidates.len(), radius);
    Ok(response::ok(MatchResponse {
        project_id: project.id,
        max_distance_miles: radius,
        candidates,
    }))
}

/// Match a project and invite every candidate
///
/// POST /api/v1/projects/:id/invitations?max_distance_miles=
pub async fn send_project_invitations(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let radius = query.radius(app_state.config.matching.default_max_distance_miles)?;
    let pool = app_state.db.pool();
    let project = load_project(pool, &id).await?;

    let request = MatchRequest::for_project(&project, radius)?;
    let candidates = matching::find_matches(pool, &request).await?;

    let summary = invitations::send_invitations(
        pool,
        app_state.mailer.as_ref(),
        &app_state.config.invitation_settings(),
        &project.id,
        &candidates,
        Utc::now(),
    )
    .await?;

    tracing::info!(
        "Project {}: {} invitations sent, {} skipped, {} failed",
        project.id,
        summary.sent,
        summary.skipped,
        summary.failed
    );
    Ok(response::created(summary))
}

/// List a project's invitations, nearest linguist first
///
/// GET /api/v1/projects/:id/invitations
pub async fn list_project_invitations(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    load_project(pool, &id).await?;
    let invitations = InvitationRepository::list_by_project(pool, &id).await?;
    Ok(response::ok(invitations))
}

/// List purchase orders issued for a project
///
/// GET /api/v1/projects/:id/purchase-orders
pub async fn list_purchase_orders(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    load_project(pool, &id).await?;
    let orders = PurchaseOrderRepository::list_by_project(pool, &id).await?;
    Ok(response::ok(orders))
}
