use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clerkship_core::models::record::Document;
use clerkship_wizard::view::PageView;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CreatedSession {
    session_id: Uuid,
    view: PageView,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    code: String,
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<CreatedSession>, ApiError> {
    let (session_id, session) = state.sessions.open(state.new_wizard()).await;
    let view = session.lock().await.view().await?;
    tracing::info!(session = %session_id, "session opened");
    Ok(Json(CreatedSession { session_id, view }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    Ok(Json(wizard.view().await?))
}

pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    wizard.advance().await?;
    Ok(Json(wizard.view().await?))
}

pub async fn login(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    wizard.login(&req.code).await?;
    Ok(Json(wizard.view().await?))
}

pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    Ok(Json(wizard.summary().await?))
}

/// Finish the case and drop the session. Stored answers are kept.
pub async fn finish_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, ApiError> {
    let session = state.sessions.get(id).await?;
    session.lock().await.finish()?;
    state.sessions.close(id).await;
    tracing::info!(session = %id, "session closed");
    Ok(Json(()))
}
