//! Linguist endpoint handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::validation::validate_pagination,
    models::{
        CreateLinguistRequest, LinguistResponse, PageQuery, SetLanguagesRequest,
        UpdateLinguistRequest, MAX_PER_PAGE,
    },
    response,
    routes::AppState,
};
use crate::db::error::is_unique_violation;
use crate::db::models::{Linguist, LinguistLanguage};
use crate::db::repositories::{LanguageRepository, LinguistRepository};
use crate::db::DatabasePool;

fn email_conflict(email: &str) -> impl FnOnce(sqlx::Error) -> ApiError + '_ {
    move |e| {
        if is_unique_violation(&e) {
            ApiError::Conflict(format!("a linguist with email {} already exists", email))
        } else {
            e.into()
        }
    }
}

async fn load_linguist(pool: &DatabasePool, id: &str) -> ApiResult<Linguist> {
    LinguistRepository::get_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Linguist {} not found", id)))
}

async fn check_languages_exist(pool: &DatabasePool, tags: &[LinguistLanguage]) -> ApiResult<()> {
    for tag in tags {
        if !LanguageRepository::exists(pool, &tag.language_code).await? {
            return Err(ApiError::BadRequest(format!(
                "Unknown language code: {}",
                tag.language_code
            )));
        }
    }
    Ok(())
}

/// Create a linguist with its initial language tags
///
/// POST /api/v1/linguists
pub async fn create_linguist(
    State(app_state): State<AppState>,
    Json(req): Json<CreateLinguistRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let pool = app_state.db.pool();
    let (linguist, tags) = req.into_parts(Uuid::new_v4().to_string());
    check_languages_exist(pool, &tags).await?;

    let mut tx = pool.begin().await?;
    let created = LinguistRepository::create(&mut *tx, &linguist)
        .await
        .map_err(email_conflict(&linguist.email))?;
    LinguistRepository::set_languages(&mut tx, &created.id, &tags).await?;
    let languages = LinguistRepository::languages_for(&mut *tx, &created.id).await?;
    tx.commit().await?;

    tracing::info!("Created linguist: {} ({})", created.id, created.full_name());
    Ok(response::created(LinguistResponse::from_db(created, languages)))
}

/// List linguists
///
/// GET /api/v1/linguists
pub async fn list_linguists(
    State(app_state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_pagination(query.page(), query.per_page(), MAX_PER_PAGE)?;

    let linguists = LinguistRepository::list(app_state.db.pool()).await?;
    Ok(response::paginated(linguists, query.page(), query.per_page()))
}

/// Get a linguist with language tags
///
/// GET /api/v1/linguists/:id
pub async fn get_linguist(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let linguist = load_linguist(pool, &id).await?;
    let languages = LinguistRepository::languages_for(pool, &id).await?;
    Ok(response::ok(LinguistResponse::from_db(linguist, languages)))
}

/// Update a linguist
///
/// PUT /api/v1/linguists/:id
pub async fn update_linguist(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateLinguistRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let pool = app_state.db.pool();
    let mut linguist = load_linguist(pool, &id).await?;
    req.apply_to(&mut linguist);

    LinguistRepository::update(pool, &linguist)
        .await
        .map_err(email_conflict(&linguist.email))?;

    tracing::info!("Updated linguist: {}", id);
    let languages = LinguistRepository::languages_for(pool, &id).await?;
    Ok(response::ok(LinguistResponse::from_db(linguist, languages)))
}

/// Delete a linguist
///
/// DELETE /api/v1/linguists/:id
pub async fn delete_linguist(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let deleted = LinguistRepository::delete(app_state.db.pool(), &id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Linguist {} not found", id)));
    }

    tracing::info!("Deleted linguist: {}", id);
    Ok(response::no_content())
}

/// Replace a linguist's language tags
///
/// PUT /api/v1/linguists/:id/languages
pub async fn set_linguist_languages(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetLanguagesRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let pool = app_state.db.pool();
    let linguist = load_linguist(pool, &id).await?;
    let tags: Vec<LinguistLanguage> = req
        .languages
        .into_iter()
        .map(|tag| tag.into_row(&id))
        .collect();
    check_languages_exist(pool, &tags).await?;

    let mut tx = pool.begin().await?;
    LinguistRepository::set_languages(&mut tx, &id, &tags).await?;
    let languages = LinguistRepository::languages_for(&mut *tx, &id).await?;
    tx.commit().await?;

    tracing::info!("Linguist {} now has {} language tags", id, languages.len());
    Ok(response::ok(LinguistResponse::from_db(linguist, languages)))
}
