use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clerkship_core::models::vitals::VitalSigns;
use clerkship_wizard::history::Exchange;
use clerkship_wizard::steps::grid::GridForm;
use clerkship_wizard::view::PageView;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DiagnosesRequest {
    diagnoses: Vec<String>,
}

#[derive(Deserialize)]
pub struct InterventionsRequest {
    interventions: Vec<String>,
}

#[derive(Deserialize)]
pub struct FocusedExamRequest {
    #[serde(default)]
    excluded: Vec<String>,
    #[serde(default)]
    confirmed: Vec<String>,
}

#[derive(Deserialize)]
pub struct AskRequest {
    question: String,
}

#[derive(Serialize)]
pub struct Findings {
    component: String,
    findings: String,
}

pub async fn submit_intake(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(vitals): Json<VitalSigns>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    wizard.submit_intake(vitals).await?;
    Ok(Json(wizard.view().await?))
}

pub async fn submit_diagnoses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DiagnosesRequest>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    wizard.submit_diagnoses(&req.diagnoses).await?;
    Ok(Json(wizard.view().await?))
}

pub async fn submit_interventions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InterventionsRequest>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    wizard.submit_interventions(&req.interventions).await?;
    Ok(Json(wizard.view().await?))
}

pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AskRequest>,
) -> Result<Json<Exchange>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    Ok(Json(wizard.ask(&req.question).await?))
}

pub async fn end_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    wizard.end_history().await?;
    Ok(Json(wizard.view().await?))
}

pub async fn submit_focused_exam(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FocusedExamRequest>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    wizard.submit_focused_exam(&req.excluded, &req.confirmed).await?;
    Ok(Json(wizard.view().await?))
}

pub async fn submit_grid(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<GridForm>,
) -> Result<Json<PageView>, ApiError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = session.lock().await;
    wizard.submit_grid(form).await?;
    Ok(Json(wizard.view().await?))
}

pub async fn exam_findings(
    State(state): State<AppState>,
    Path((id, component)): Path<(Uuid, String)>,
) -> Result<Json<Findings>, ApiError> {
    let session = state.sessions.get(id).await?;
    let wizard = session.lock().await;
    let findings = wizard
        .exam_findings(&component)?
        .ok_or_else(|| ApiError::NotFound(format!("no findings for {component}")))?;
    Ok(Json(Findings {
        component,
        findings,
    }))
}

/// The image for a result, served with a content type from its extension.
pub async fn result_image(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<Response, ApiError> {
    let session = state.sessions.get(id).await?;
    let path = session
        .lock()
        .await
        .result_image(&name)?
        .ok_or_else(|| ApiError::NotFound(format!("no image for result {name}")))?;
    let content_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    };
    let bytes = tokio::fs::read(&path).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
