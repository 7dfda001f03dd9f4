//! Handlers de los endpoints de traduccion.

use axum::{
    extract::{Query, State},
    response::Json,
};
use rinkside_core::{BatchTranslationRequest, LangCode, TranslationRequest};
use serde::Deserialize;
use tracing::instrument;

use super::response::{BatchTranslateResponse, InvalidateResponse, TranslateResponse};
use crate::error::AppError;
use crate::extractors::AppJson;
use crate::state::AppState;
use crate::translate::ServiceStats;

/// POST /api/translate
#[instrument(skip_all, fields(target_lang = %request.target_lang))]
pub async fn translate(
    State(state): State<AppState>,
    AppJson(request): AppJson<TranslationRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    let key = request.validate()?;
    let outcome = state.translations().translate(key).await?;

    Ok(Json(outcome.into()))
}

/// POST /api/translate/batch
#[instrument(skip_all, fields(target_lang = %request.target_lang, texts = request.texts.len()))]
pub async fn translate_batch(
    State(state): State<AppState>,
    AppJson(request): AppJson<BatchTranslationRequest>,
) -> Result<Json<BatchTranslateResponse>, AppError> {
    let keys = request.validate()?;
    let outcomes = state.translations().translate_batch(keys).await?;

    Ok(Json(BatchTranslateResponse {
        translations: outcomes.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/translate/stats
pub async fn stats(State(state): State<AppState>) -> Json<ServiceStats> {
    Json(state.translations().stats().await)
}

#[derive(Debug, Deserialize)]
pub struct InvalidateQuery {
    pub target_lang: Option<String>,
}

/// DELETE /api/translate/cache
/// Invalida todo el cache, o solo un idioma destino con `?target_lang=`.
#[instrument(skip_all, fields(target_lang = ?query.target_lang))]
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Query(query): Query<InvalidateQuery>,
) -> Result<Json<InvalidateResponse>, AppError> {
    let cache = state.translations().cache();

    let response = match query.target_lang.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => {
            let target = LangCode::parse(code)?;
            let result = cache.invalidate_by_target(&target).await;
            InvalidateResponse {
                invalidated: result.count,
                message: format!(
                    "Invalidated {} cached translations into {}",
                    result.count, target
                ),
            }
        },
        _ => {
            let result = cache.invalidate_everything().await;
            InvalidateResponse {
                invalidated: result.count,
                message: format!("Invalidated all {} cached translations", result.count),
            }
        },
    };

    Ok(Json(response))
}
