//! Handlers REST sobre el store de documentos JSON.
//!
//! Sigue las convenciones de json-server que usa el front-end: las
//! colecciones son arrays de primer nivel y los query params filtran por igualdad.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rinkside_store::Filter;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::response::CollectionsResponse;
use crate::error::AppError;
use crate::extractors::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CollectionPath {
    pub collection: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordPath {
    pub collection: String,
    pub id: String,
}

/// GET /api/db
pub async fn list_collections(State(state): State<AppState>) -> Json<CollectionsResponse> {
    Json(CollectionsResponse {
        collections: state.store().collections().await,
    })
}

/// GET /api/db/{collection}
#[instrument(skip_all, fields(collection = %path.collection))]
pub async fn list_records(
    State(state): State<AppState>,
    Path(path): Path<CollectionPath>,
    Query(filter): Query<Filter>,
) -> Result<Json<Vec<Value>>, AppError> {
    let records = state.store().list(&path.collection, &filter).await?;
    Ok(Json(records))
}

/// GET /api/db/{collection}/{id}
#[instrument(skip_all, fields(collection = %path.collection, id = %path.id))]
pub async fn get_record(
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
) -> Result<Json<Value>, AppError> {
    let record = state.store().get(&path.collection, &path.id).await?;
    Ok(Json(record))
}

/// POST /api/db/{collection}
#[instrument(skip_all, fields(collection = %path.collection))]
pub async fn create_record(
    State(state): State<AppState>,
    Path(path): Path<CollectionPath>,
    AppJson(record): AppJson<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state.store().insert(&path.collection, record).await?;
    tracing::info!(id = %created[rinkside_store::ID_FIELD], "Record created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/db/{collection}/{id}
#[instrument(skip_all, fields(collection = %path.collection, id = %path.id))]
pub async fn replace_record(
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
    AppJson(record): AppJson<Value>,
) -> Result<Json<Value>, AppError> {
    let updated = state
        .store()
        .replace(&path.collection, &path.id, record)
        .await?;
    Ok(Json(updated))
}

/// PATCH /api/db/{collection}/{id}
#[instrument(skip_all, fields(collection = %path.collection, id = %path.id))]
pub async fn patch_record(
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
    AppJson(partial): AppJson<Value>,
) -> Result<Json<Value>, AppError> {
    let updated = state
        .store()
        .patch(&path.collection, &path.id, partial)
        .await?;
    Ok(Json(updated))
}

/// DELETE /api/db/{collection}/{id}
#[instrument(skip_all, fields(collection = %path.collection, id = %path.id))]
pub async fn delete_record(
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
) -> Result<Json<Value>, AppError> {
    let removed = state.store().delete(&path.collection, &path.id).await?;
    tracing::info!("Record deleted");
    Ok(Json(removed))
}
