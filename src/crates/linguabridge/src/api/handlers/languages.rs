//! Language endpoint handlers

use axum::{extract::State, Json};

use crate::api::{
    error::{ApiError, ApiResult},
    models::CreateLanguageRequest,
    response,
    routes::AppState,
};
use crate::db::error::is_unique_violation;
use crate::db::repositories::LanguageRepository;

/// List languages
///
/// GET /api/v1/languages
pub async fn list_languages(
    State(app_state): State<AppState>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let languages = LanguageRepository::list(app_state.db.pool()).await?;
    Ok(response::ok(languages))
}

/// Add a language
///
/// POST /api/v1/languages
pub async fn create_language(
    State(app_state): State<AppState>,
    Json(req): Json<CreateLanguageRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;
    let code = req.normalized_code();

    let language = LanguageRepository::create(app_state.db.pool(), &code, req.name.trim())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!("language {} already exists", code))
            } else {
                e.into()
            }
        })?;

    tracing::info!("Added language {}", language.code);
    Ok(response::created(language))
}
