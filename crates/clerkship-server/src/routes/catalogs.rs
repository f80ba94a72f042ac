use axum::extract::{Path, State};
use axum::Json;

use clerkship_wizard::CatalogKind;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_catalog(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let kind = CatalogKind::parse(&name)
        .ok_or_else(|| ApiError::NotFound(format!("catalog not found: {name}")))?;
    Ok(Json(state.case.catalog(kind).entries().to_vec()))
}
