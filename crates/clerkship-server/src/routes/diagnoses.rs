use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use clerkship_core::models::diagnoses::Priority;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
pub struct PriorityRequest {
    slot: usize,
    priority: Priority,
}

#[derive(Deserialize)]
pub struct ReplaceRequest {
    slot: usize,
    name: String,
}

pub async fn search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    Ok(Json(wizard.search_diagnoses(&query.q).await?))
}

pub async fn adjust_priority(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PriorityRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    Ok(Json(wizard.adjust_priority(req.slot, req.priority).await?))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplaceRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    Ok(Json(wizard.replace_diagnosis(req.slot, &req.name).await?))
}
