use axum::middleware as axum_mw;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware;
use crate::state::AppState;

pub mod catalogs;
pub mod diagnoses;
pub mod health;
pub mod sessions;
pub mod steps;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/catalogs/{name}", get(catalogs::get_catalog))
        // Session lifecycle
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{id}", get(sessions::get_session))
        .route("/sessions/{id}", delete(sessions::finish_session))
        .route("/sessions/{id}/advance", post(sessions::advance))
        .route("/sessions/{id}/login", post(sessions::login))
        .route("/sessions/{id}/summary", get(sessions::summary))
        // Step submissions
        .route("/sessions/{id}/intake", post(steps::submit_intake))
        .route("/sessions/{id}/diagnoses", post(steps::submit_diagnoses))
        .route("/sessions/{id}/interventions", post(steps::submit_interventions))
        .route("/sessions/{id}/history/ask", post(steps::ask))
        .route("/sessions/{id}/history/end", post(steps::end_history))
        .route("/sessions/{id}/focused-exam", post(steps::submit_focused_exam))
        .route("/sessions/{id}/grid", post(steps::submit_grid))
        .route(
            "/sessions/{id}/exam-findings/{component}",
            get(steps::exam_findings),
        )
        .route("/sessions/{id}/results/{name}", get(steps::result_image))
        // Reorder panel
        .route("/sessions/{id}/diagnoses/search", get(diagnoses::search))
        .route("/sessions/{id}/diagnoses/priority", post(diagnoses::adjust_priority))
        .route("/sessions/{id}/diagnoses/replace", post(diagnoses::replace))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests;
